use crate::crypto::{Hash, PublicKey};

/// Fragments the external store may now drop.
///
/// Emitted whenever metadata blobs that certified fragments disappear: an
/// explicit blob removal, a sharing key being banned, or a user being
/// removed. The registry only announces; whoever drains the channel talks to
/// the fragment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRelease {
    pub owner: String,
    pub sharing_key: PublicKey,
    pub hashes: Vec<Hash>,
}

pub type ReleaseReceiver = flume::Receiver<FragmentRelease>;
pub type ReleaseSender = flume::Sender<FragmentRelease>;
