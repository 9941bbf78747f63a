//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! The X API authenticates user-context requests with an OAuth 1.0a
//! `Authorization` header. Only query and form parameters participate in the
//! signature; JSON and multipart bodies do not, which keeps this signer small.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

use crate::config::CredentialSet;

type HmacSha1 = Hmac<Sha1>;

/// Build the `Authorization: OAuth ...` header value for a request.
///
/// `extra_params` are request parameters that participate in the signature
/// (query-string or form-urlencoded parameters; none for JSON bodies).
pub fn authorization_header(
    creds: &CredentialSet<'_>,
    method: &str,
    url: &str,
    extra_params: &[(&str, &str)],
) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp().to_string();

    authorization_header_at(creds, method, url, extra_params, &nonce, &timestamp)
}

fn authorization_header_at(
    creds: &CredentialSet<'_>,
    method: &str,
    url: &str,
    extra_params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let oauth_params: [(&str, &str); 6] = [
        ("oauth_consumer_key", creds.api_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", creds.access_token),
        ("oauth_version", "1.0"),
    ];

    let mut all_params: Vec<(&str, &str)> = Vec::with_capacity(oauth_params.len() + extra_params.len());
    all_params.extend_from_slice(&oauth_params);
    all_params.extend_from_slice(extra_params);

    let base = signature_base_string(method, url, &all_params);
    let signing_key = format!(
        "{}&{}",
        percent(creds.api_key_secret),
        percent(creds.access_token_secret)
    );
    let signature = hmac_sha1_base64(&signing_key, &base);

    let mut header_params: Vec<(&str, String)> = oauth_params
        .iter()
        .map(|(k, v)| (*k, percent(v)))
        .collect();
    header_params.push(("oauth_signature", percent(&signature)));
    header_params.sort();

    let fields: Vec<String> = header_params
        .into_iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect();
    format!("OAuth {}", fields.join(", "))
}

/// RFC 5849 §3.4.1 signature base string: method, base URL and the
/// percent-encoded, sorted parameter string, joined by `&`.
fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent(k), percent(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent(url),
        percent(&param_string)
    )
}

fn hmac_sha1_base64(key: &str, message: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// RFC 3986 percent-encoding with the unreserved set `A-Z a-z 0-9 - . _ ~`,
/// as OAuth requires. `urlencoding` implements exactly this set.
fn percent(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    // The platform's published HMAC-SHA1 worked example ("Creating a
    // signature" in the developer docs).
    fn example_creds() -> Credentials {
        Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    const EXAMPLE_URL: &str = "https://api.twitter.com/1.1/statuses/update.json";
    const EXAMPLE_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const EXAMPLE_TIMESTAMP: &str = "1318622958";

    fn example_params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("include_entities", "true"),
            (
                "status",
                "Hello Ladies + Gentlemen, a signed OAuth request!",
            ),
        ]
    }

    #[test]
    fn test_percent_encoding_unreserved_set() {
        assert_eq!(percent("abcXYZ019-._~"), "abcXYZ019-._~");
        assert_eq!(percent("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent("☃"), "%E2%98%83");
        assert_eq!(percent("a!b"), "a%21b");
    }

    #[test]
    fn test_signature_base_string_matches_worked_example() {
        let creds = example_creds();
        let set = creds.require().unwrap();

        let mut params = vec![
            ("oauth_consumer_key", set.api_key),
            ("oauth_nonce", EXAMPLE_NONCE),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", EXAMPLE_TIMESTAMP),
            ("oauth_token", set.access_token),
            ("oauth_version", "1.0"),
        ];
        params.extend(example_params());

        let base = signature_base_string("POST", EXAMPLE_URL, &params);
        assert!(base.starts_with(
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue"
        ));
        assert!(base.ends_with(
            "%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        ));
    }

    #[test]
    fn test_signature_matches_worked_example() {
        let creds = example_creds();
        let set = creds.require().unwrap();

        let header = authorization_header_at(
            &set,
            "POST",
            EXAMPLE_URL,
            &example_params(),
            EXAMPLE_NONCE,
            EXAMPLE_TIMESTAMP,
        );

        // hCtSmYh+iHYCEqBWrE7C7hYmtUk= percent-encoded
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn test_header_shape() {
        let creds = example_creds();
        let set = creds.require().unwrap();

        let header =
            authorization_header_at(&set, "POST", EXAMPLE_URL, &[], EXAMPLE_NONCE, EXAMPLE_TIMESTAMP);

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_version=\"1.0\""));
        // Header carries only oauth_* fields, never request parameters.
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        // RFC 2202 test case 2: key "Jefe", data "what do ya want for nothing?"
        let signature = hmac_sha1_base64("Jefe", "what do ya want for nothing?");
        let bytes = BASE64.decode(signature).unwrap();
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(hex, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }
}
