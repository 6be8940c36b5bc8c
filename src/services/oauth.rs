// src/services/oauth.rs

//! OAuth 1.0a request signing.
//!
//! The Tumblr API authenticates every call with an OAuth 1.0a
//! `Authorization` header (HMAC-SHA1 signature method). Parameter
//! normalization follows RFC 5849: percent-encode keys and values with the
//! unreserved set, sort, join, then sign `METHOD&url&params` with
//! `consumer_secret&token_secret`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;

use crate::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// Signs outbound requests with a fixed consumer/token credential pair.
pub struct OauthSigner {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OauthSigner {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            consumer_key: credentials.consumer_key.clone(),
            consumer_secret: credentials.consumer_secret.clone(),
            token: credentials.oauth_token.clone(),
            token_secret: credentials.oauth_secret.clone(),
        }
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// `url` must be the request URL without a query string; `params` are
    /// the query or form parameters that will travel with the request.
    pub fn authorization(&self, method: &str, url: &str, params: &[(&str, String)]) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let timestamp = Utc::now().timestamp().to_string();
        self.authorization_with(method, url, params, &nonce, &timestamp)
    }

    // Deterministic core, split out so tests can pin nonce and timestamp.
    fn authorization_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let oauth_params = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.sign(method, url, params, &oauth_params);

        let mut header_params: Vec<(&str, String)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        header_params.push(("oauth_signature", signature));

        let fields = header_params
            .iter()
            .map(|(k, v)| format!(r#"{}="{}""#, k, encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {fields}")
    }

    /// The base64 HMAC-SHA1 signature over the normalized base string.
    fn sign(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        oauth_params: &[(&str, &str)],
    ) -> String {
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        pairs.sort();

        let parameter_string = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&parameter_string)
        );
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("any key length works");
        mac.update(base.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

// RFC 3986 unreserved set, which urlencoding implements exactly.
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
