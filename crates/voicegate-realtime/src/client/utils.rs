use crate::client::config::Config;
use crate::client::consts::{AUTHORIZATION_HEADER, VOICEGATE_CLIENT_HEADER};
use secrecy::ExposeSecret;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

pub fn build_request(config: &Config) -> tokio_tungstenite::tungstenite::Result<Request> {
    let mut request = format!("{}/call", config.base_url()).into_client_request()?;
    request.headers_mut().insert(
        AUTHORIZATION_HEADER,
        format!("Bearer {}", config.api_key().expose_secret())
            .as_str()
            .parse()?,
    );
    request
        .headers_mut()
        .insert(VOICEGATE_CLIENT_HEADER, "calls=v1".parse()?);
    Ok(request)
}
