use std::collections::BTreeMap;
use std::net::SocketAddr;

use clap::Args;

use dirnode_daemon::http_server::api::v0::storage::RegisterRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::StorageError;

/// Pledge a storage node to one or more users
#[derive(Args, Debug, Clone)]
pub struct Register {
    /// Username donating the node
    #[arg(long)]
    pub donor: String,

    #[arg(long)]
    pub address: SocketAddr,

    /// Beneficiary share as USER=FRACTION; repeat per beneficiary. Defaults
    /// to the whole node for the donor.
    #[arg(long = "share")]
    pub shares: Vec<String>,
}

fn parse_shares(donor: &str, shares: &[String]) -> Result<BTreeMap<String, f64>, StorageError> {
    if shares.is_empty() {
        return Ok(BTreeMap::from([(donor.to_string(), 1.0)]));
    }
    let mut parsed = BTreeMap::new();
    for share in shares {
        let (user, fraction) = share
            .split_once('=')
            .ok_or_else(|| StorageError::Share(share.clone()))?;
        let fraction = fraction
            .trim()
            .parse::<f64>()
            .map_err(|_| StorageError::Share(share.clone()))?;
        // a repeated beneficiary would otherwise collapse into one entry
        if parsed.insert(user.trim().to_string(), fraction).is_some() {
            return Err(StorageError::Share(share.clone()));
        }
    }
    Ok(parsed)
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Register {
    type Error = StorageError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = RegisterRequest {
            donor: self.donor.clone(),
            address: self.address,
            fractions: parse_shares(&self.donor, &self.shares)?,
        };
        Ok(ctx.client.call(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shares() {
        let shares = parse_shares("alice", &[]).unwrap();
        assert_eq!(shares, BTreeMap::from([("alice".to_string(), 1.0)]));

        let shares =
            parse_shares("alice", &["bob=0.25".to_string(), "carol = 0.75".to_string()]).unwrap();
        assert_eq!(shares["bob"], 0.25);
        assert_eq!(shares["carol"], 0.75);

        assert!(matches!(
            parse_shares("alice", &["bob".to_string()]),
            Err(StorageError::Share(_))
        ));
        assert!(matches!(
            parse_shares("alice", &["bob=half".to_string()]),
            Err(StorageError::Share(_))
        ));
    }

    #[test]
    fn test_parse_shares_rejects_repeated_beneficiary() {
        let shares = ["bob=0.5".to_string(), "bob = 0.5".to_string()];
        match parse_shares("alice", &shares) {
            Err(StorageError::Share(share)) => assert_eq!(share, "bob = 0.5"),
            other => panic!("expected a share error, got {other:?}"),
        }
    }
}
