//! AWS Signature Version 4
//!
//! Only what a JSON-protocol POST needs: no query string, a single path, and
//! a fully buffered body.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::credentials::AwsCredentials;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// The request as seen by the signer
#[derive(Debug, Clone)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    /// Headers to sign, including `host`
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

/// Compute the headers that sign `request`
///
/// Returns `x-amz-date`, `x-amz-security-token` when the credentials carry a
/// session token, and `authorization`.
pub fn sign_request(
    request: &SignableRequest<'_>,
    credentials: &AwsCredentials,
    region: &str,
    service: &str,
    time: DateTime<Utc>,
) -> Vec<(String, String)> {
    let amz_date = time.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = time.format("%Y%m%d").to_string();

    let mut headers: BTreeMap<String, String> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
        .collect();
    headers.insert("x-amz-date".to_string(), amz_date.clone());
    if let Some(token) = &credentials.session_token {
        headers.insert("x-amz-security-token".to_string(), token.clone());
    }

    let (canonical, signed_headers) =
        canonical_request(request.method, request.path, &headers, &hex_sha256(request.body));
    let scope = format!("{}/{}/{}/aws4_request", date_stamp, region, service);
    let to_sign = string_to_sign(&amz_date, &scope, &canonical);

    let key = derive_signing_key(&credentials.secret_access_key, &date_stamp, region, service);
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes()));

    let mut out = vec![("x-amz-date".to_string(), amz_date)];
    if let Some(token) = &credentials.session_token {
        out.push(("x-amz-security-token".to_string(), token.clone()));
    }
    out.push((
        "authorization".to_string(),
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
        ),
    ));
    out
}

/// Build the canonical request; returns it with the signed-headers list
///
/// `headers` must already be keyed by lowercase name.
pub fn canonical_request(
    method: &str,
    path: &str,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> (String, String) {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    let canonical = format!(
        "{}\n{}\n\n{}\n{}\n{}",
        method, path, canonical_headers, signed_headers, payload_hash
    );
    (canonical, signed_headers)
}

pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex_sha256(canonical_request.as_bytes())
    )
}

pub fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

pub fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    #[test]
    fn test_empty_payload_hash() {
        assert_eq!(
            hex_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_derive_signing_key_published_example() {
        let key = derive_signing_key(EXAMPLE_SECRET, "20120215", "us-east-1", "iam");
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_get_vanilla_suite_case() {
        let credentials = AwsCredentials::new("AKIDEXAMPLE", EXAMPLE_SECRET);
        let time = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let request = SignableRequest {
            method: "GET",
            path: "/",
            headers: &[("Host", "example.amazonaws.com")],
            body: b"",
        };

        let headers = sign_request(&request, &credentials, "us-east-1", "service", time);

        assert_eq!(headers[0], ("x-amz-date".to_string(), "20150830T123600Z".to_string()));
        assert_eq!(
            headers[1].1,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn test_canonical_request_layout() {
        let mut headers = BTreeMap::new();
        headers.insert("x-amz-target".to_string(), "AmazonSSM.GetParameters".to_string());
        headers.insert("host".to_string(), "ssm.us-east-1.amazonaws.com".to_string());

        let (canonical, signed) = canonical_request("POST", "/", &headers, "abc");

        assert_eq!(signed, "host;x-amz-target");
        assert_eq!(
            canonical,
            "POST\n/\n\nhost:ssm.us-east-1.amazonaws.com\nx-amz-target:AmazonSSM.GetParameters\n\nhost;x-amz-target\nabc"
        );
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = AwsCredentials::new("AKIDEXAMPLE", EXAMPLE_SECRET).with_session_token("tok");
        let time = Utc.with_ymd_and_hms(2021, 8, 29, 0, 0, 0).unwrap();
        let request = SignableRequest {
            method: "POST",
            path: "/",
            headers: &[("host", "ssm.ap-northeast-1.amazonaws.com")],
            body: b"{}",
        };

        let headers = sign_request(&request, &credentials, "ap-northeast-1", "ssm", time);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[1], ("x-amz-security-token".to_string(), "tok".to_string()));
        assert!(headers[2].1.contains("SignedHeaders=host;x-amz-date;x-amz-security-token,"));
        assert!(headers[2].1.contains("/20210829/ap-northeast-1/ssm/aws4_request"));
    }
}
