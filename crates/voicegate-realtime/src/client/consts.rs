pub const VOICEGATE_API_KEY: &str = "VOICEGATE_API_KEY";

pub const BASE_URL: &str = "wss://relay.voicegate.io/v1";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const VOICEGATE_CLIENT_HEADER: &str = "VoiceGate-Client";
