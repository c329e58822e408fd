//! Source verification through the Etherscan v2 API.
//!
//! Submission returns a GUID right away; the verdict has to be polled with
//! `checkverifystatus` until it leaves the queue.

use crate::artifacts::{Artifact, ArtifactStore, BuildInfo};
use ntnft_lib::{DeployError, DeploymentRecord, SourceVerifier};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

pub const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

const STANDARD_JSON_FORMAT: &str = "solidity-standard-json-input";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 12;

#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    pub message: String,
    pub result: String,
}

/// What a submission or status response means for us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Submission accepted, holds the GUID to poll
    Submitted(String),
    Pending,
    Verified,
    Failed(String),
}

fn is_already_verified(result: &str) -> bool {
    result.to_lowercase().contains("already verified")
}

impl EtherscanResponse {
    /// Interpret a `verifysourcecode` response.
    pub fn submission_status(&self) -> VerifyStatus {
        if self.status == "1" {
            VerifyStatus::Submitted(self.result.clone())
        } else if is_already_verified(&self.result) {
            VerifyStatus::Verified
        } else {
            VerifyStatus::Failed(format!("{}: {}", self.message, self.result))
        }
    }

    /// Interpret a `checkverifystatus` response.
    pub fn check_status(&self) -> VerifyStatus {
        if self.result.contains("Pending in queue") {
            VerifyStatus::Pending
        } else if self.status == "1" || is_already_verified(&self.result) {
            VerifyStatus::Verified
        } else {
            VerifyStatus::Failed(self.result.clone())
        }
    }
}

/// Form fields of a `verifysourcecode` submission.
pub fn submission_form(
    record: &DeploymentRecord,
    artifact: &Artifact,
    build_info: &BuildInfo,
) -> Vec<(&'static str, String)> {
    vec![
        ("module", "contract".to_string()),
        ("action", "verifysourcecode".to_string()),
        ("contractaddress", record.address.to_string()),
        ("sourceCode", build_info.input.to_string()),
        ("codeformat", STANDARD_JSON_FORMAT.to_string()),
        ("contractname", artifact.qualified_name()),
        ("compilerversion", format!("v{}", build_info.solc_long_version)),
        // sic, the API spells it this way
        ("constructorArguements", record.encoded_args_hex()),
    ]
}

/// [`SourceVerifier`] backed by an Etherscan-compatible explorer.
#[derive(Debug, Clone)]
pub struct EtherscanVerifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    chain_id: u64,
    artifacts: ArtifactStore,
    poll_interval: Duration,
    max_polls: u32,
}

impl EtherscanVerifier {
    pub fn new(api_key: impl Into<String>, chain_id: u64, artifacts: ArtifactStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: ETHERSCAN_API_URL.to_string(),
            api_key: api_key.into(),
            chain_id,
            artifacts,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Point at another Etherscan-compatible API.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chainid", self.chain_id.to_string()),
            ("apikey", self.api_key.clone()),
        ]
    }

    async fn submit(&self, record: &DeploymentRecord) -> Result<EtherscanResponse, DeployError> {
        let artifact = self.artifacts.load(&record.contract_name)?;
        let build_info = self.artifacts.build_info(&artifact)?;
        let form = submission_form(record, &artifact, &build_info);

        self.client
            .post(&self.api_url)
            .query(&self.query())
            .form(&form)
            .send()
            .await
            .map_err(|e| DeployError::verification(record.address, e))?
            .json()
            .await
            .map_err(|e| DeployError::verification(record.address, e))
    }

    async fn check(
        &self,
        record: &DeploymentRecord,
        guid: &str,
    ) -> Result<EtherscanResponse, DeployError> {
        self.client
            .get(&self.api_url)
            .query(&self.query())
            .query(&[
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await
            .map_err(|e| DeployError::verification(record.address, e))?
            .json()
            .await
            .map_err(|e| DeployError::verification(record.address, e))
    }
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, record: &DeploymentRecord) -> Result<(), DeployError> {
        let guid = match self.submit(record).await?.submission_status() {
            VerifyStatus::Submitted(guid) => guid,
            VerifyStatus::Verified => {
                info!("{} is already verified", record.address);
                return Ok(());
            }
            VerifyStatus::Failed(reason) => {
                return Err(DeployError::verification(record.address, reason))
            }
            VerifyStatus::Pending => {
                return Err(DeployError::verification(
                    record.address,
                    "submission was not assigned a guid",
                ))
            }
        };
        debug!("verification submitted, guid {guid}");

        for _ in 0..self.max_polls {
            sleep(self.poll_interval).await;
            match self.check(record, &guid).await?.check_status() {
                VerifyStatus::Pending => debug!("verification of {} pending", record.address),
                VerifyStatus::Verified => {
                    info!("Verified {} at {}", record.contract_name, record.address);
                    return Ok(());
                }
                VerifyStatus::Failed(reason) => {
                    return Err(DeployError::verification(record.address, reason))
                }
                VerifyStatus::Submitted(_) => {}
            }
        }

        Err(DeployError::verification(
            record.address,
            format!("still pending after {} checks", self.max_polls),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::write_artifact;
    use alloy::primitives::Address;
    use ntnft_lib::ConstructorArg;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Read one HTTP request and return its request line.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-request");
            buf.extend_from_slice(&chunk[..n]);

            let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return head.lines().next().unwrap_or_default().to_string();
            }
        }
    }

    /// Serve one canned JSON body per connection, in order, and hand back
    /// the request lines seen.
    async fn explorer(bodies: Vec<&'static str>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for body in bodies {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });
        (url, handle)
    }

    /// Verifier against `url` with artifacts for NTNFT, plus the record to verify.
    fn verifier_for(url: &str, root: &std::path::Path) -> (EtherscanVerifier, DeploymentRecord) {
        write_artifact(root, "NTNFT", "0x6080");
        let verifier = EtherscanVerifier::new("KEY", 5, ArtifactStore::new(root))
            .with_api_url(url)
            .with_polling(Duration::ZERO, 2);
        let record = DeploymentRecord::new(
            "NTNFT",
            Address::repeat_byte(0xe7),
            vec![ConstructorArg::Address(Address::repeat_byte(0x5f))],
        );
        (verifier, record)
    }

    const SUBMITTED: &str = r#"{"status":"1","message":"OK","result":"guid-1"}"#;
    const PENDING: &str = r#"{"status":"0","message":"NOTOK","result":"Pending in queue"}"#;

    fn response(status: &str, message: &str, result: &str) -> EtherscanResponse {
        EtherscanResponse {
            status: status.into(),
            message: message.into(),
            result: result.into(),
        }
    }

    #[test]
    fn test_submission_status() {
        assert_eq!(
            response("1", "OK", "abc123").submission_status(),
            VerifyStatus::Submitted("abc123".into())
        );
        assert_eq!(
            response("0", "NOTOK", "Contract source code already verified").submission_status(),
            VerifyStatus::Verified
        );
        assert!(matches!(
            response("0", "NOTOK", "Invalid API Key").submission_status(),
            VerifyStatus::Failed(reason) if reason.contains("Invalid API Key")
        ));
    }

    #[test]
    fn test_check_status() {
        assert_eq!(
            response("0", "NOTOK", "Pending in queue").check_status(),
            VerifyStatus::Pending
        );
        assert_eq!(
            response("1", "OK", "Pass - Verified").check_status(),
            VerifyStatus::Verified
        );
        assert_eq!(
            response("0", "NOTOK", "Already Verified").check_status(),
            VerifyStatus::Verified
        );
        assert_eq!(
            response("0", "NOTOK", "Fail - Unable to verify").check_status(),
            VerifyStatus::Failed("Fail - Unable to verify".into())
        );
    }

    #[test]
    fn test_response_parses_api_json() {
        let parsed: EtherscanResponse =
            serde_json::from_str(r#"{"status":"1","message":"OK","result":"guid"}"#).unwrap();
        assert_eq!(parsed.result, "guid");
    }

    #[test]
    fn test_submission_form_for_nft() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "NTNFT", "0x6080");
        let store = ArtifactStore::new(root.path());
        let artifact = store.load("NTNFT").unwrap();
        let build_info = store.build_info(&artifact).unwrap();

        let verifier = Address::repeat_byte(0x5f);
        let record = DeploymentRecord::new(
            "NTNFT",
            Address::repeat_byte(0xe7),
            vec![ConstructorArg::Address(verifier)],
        );
        let form = submission_form(&record, &artifact, &build_info);
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .unwrap()
        };

        assert_eq!(field("contractname"), "contracts/NTNFT.sol:NTNFT");
        assert_eq!(field("compilerversion"), "v0.8.17+commit.8df45f5f");
        assert_eq!(field("codeformat"), STANDARD_JSON_FORMAT);
        let args = field("constructorArguements");
        assert_eq!(args.len(), 64);
        assert!(!args.starts_with("0x"));
        assert!(args.ends_with(&hex::encode(verifier)));
    }

    #[tokio::test]
    async fn test_verify_polls_until_verified() {
        let (url, server) = explorer(vec![
            SUBMITTED,
            PENDING,
            r#"{"status":"1","message":"OK","result":"Pass - Verified"}"#,
        ])
        .await;
        let root = tempfile::tempdir().unwrap();
        let (verifier, record) = verifier_for(&url, root.path());

        verifier.verify(&record).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("POST /api?"));
        assert!(requests[0].contains("chainid=5"));
        assert!(requests[0].contains("apikey=KEY"));
        for poll in &requests[1..] {
            assert!(poll.starts_with("GET /api?"));
            assert!(poll.contains("action=checkverifystatus"));
            assert!(poll.contains("guid=guid-1"));
        }
    }

    #[tokio::test]
    async fn test_verify_already_verified_on_submission() {
        let (url, server) = explorer(vec![
            r#"{"status":"0","message":"NOTOK","result":"Contract source code already verified"}"#,
        ])
        .await;
        let root = tempfile::tempdir().unwrap();
        let (verifier, record) = verifier_for(&url, root.path());

        verifier.verify(&record).await.unwrap();
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_gives_up_after_max_polls() {
        let (url, server) = explorer(vec![SUBMITTED, PENDING, PENDING]).await;
        let root = tempfile::tempdir().unwrap();
        let (verifier, record) = verifier_for(&url, root.path());

        let err = verifier.verify(&record).await.unwrap_err();
        assert!(matches!(
            err,
            DeployError::Verification { ref reason, .. } if reason.contains("still pending")
        ));
        assert_eq!(server.await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_verify_reports_failed_check() {
        let (url, server) = explorer(vec![
            SUBMITTED,
            r#"{"status":"0","message":"NOTOK","result":"Fail - Unable to verify"}"#,
        ])
        .await;
        let root = tempfile::tempdir().unwrap();
        let (verifier, record) = verifier_for(&url, root.path());

        let err = verifier.verify(&record).await.unwrap_err();
        assert!(matches!(
            err,
            DeployError::Verification { address, ref reason }
                if address == record.address && reason == "Fail - Unable to verify"
        ));
        assert_eq!(server.await.unwrap().len(), 2);
    }
}
