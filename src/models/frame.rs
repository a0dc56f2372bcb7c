use serde::Deserialize;

/// Body a Farcaster client POSTs when a frame button is pressed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameActionRequest {
    pub untrusted_data: Option<UntrustedData>,
    pub trusted_data: Option<TrustedData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    pub fid: Option<u64>,
    pub address: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedData {
    pub message_bytes: Option<String>,
}

impl FrameActionRequest {
    pub fn message_bytes(&self) -> Option<&str> {
        self.trusted_data
            .as_ref()
            .and_then(|data| data.message_bytes.as_deref())
            .map(str::trim)
            .filter(|bytes| !bytes.is_empty())
    }
}

/// Fields of a frame action that the validation API vouched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFrameAction {
    pub valid: bool,
    pub fid: Option<u64>,
    pub transaction_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_request_parses_camel_case_body() {
        let body = serde_json::json!({
            "untrustedData": {
                "fid": 42,
                "address": "0x0000000000000000000000000000000000000007",
                "transactionId": "0xabc",
                "buttonIndex": 1
            },
            "trustedData": { "messageBytes": "0a0b" }
        });
        let req: FrameActionRequest = serde_json::from_value(body).unwrap();
        let untrusted = req.untrusted_data.as_ref().unwrap();
        assert_eq!(untrusted.fid, Some(42));
        assert_eq!(untrusted.transaction_id.as_deref(), Some("0xabc"));
        assert_eq!(req.message_bytes(), Some("0a0b"));
    }

    #[test]
    fn blank_message_bytes_count_as_missing() {
        let req = FrameActionRequest {
            untrusted_data: None,
            trusted_data: Some(TrustedData {
                message_bytes: Some("  ".to_string()),
            }),
        };
        assert_eq!(req.message_bytes(), None);
    }
}
