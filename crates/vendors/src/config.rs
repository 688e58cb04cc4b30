use crate::chanjing::ChanjingClient;
use crate::hedra::HedraClient;
use crate::omnihuman::OmnihumanClient;
use crate::stable_avatar::StableAvatarClient;
use crate::topview::TopViewClient;
use crate::voice_clone::VoiceCloneClient;

/// Base URLs of every vendor API.
#[derive(Debug, Clone)]
pub struct VendorEndpoints {
    pub chanjing: String,
    pub hedra: String,
    pub omnihuman: String,
    pub stable_avatar: String,
    pub topview: String,
    pub cicada: String,
    pub fish_audio: String,
}

impl VendorEndpoints {
    /// Load base URLs from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                   |
    /// |--------------------------|-------------------------------------------|
    /// | `CHANJING_BASE_URL`      | `https://www.chanjing.cc/api/open/v1`     |
    /// | `HEDRA_BASE_URL`         | `https://api.hedra.com/web-app/public`    |
    /// | `OMNIHUMAN_BASE_URL`     | `https://visual.volcengineapi.com/omnihuman` |
    /// | `STABLE_AVATAR_BASE_URL` | `https://api.runpod.ai/v2/stable-avatar`  |
    /// | `TOPVIEW_BASE_URL`       | `https://api.topview.ai`                  |
    /// | `CICADA_BASE_URL`        | `https://api.cicada.ai/v1`                |
    /// | `FISH_AUDIO_BASE_URL`    | `https://api.fish.audio`                  |
    ///
    /// Trailing slashes are stripped so paths can be appended directly.
    pub fn from_env() -> Self {
        Self {
            chanjing: env_url("CHANJING_BASE_URL", "https://www.chanjing.cc/api/open/v1"),
            hedra: env_url("HEDRA_BASE_URL", "https://api.hedra.com/web-app/public"),
            omnihuman: env_url(
                "OMNIHUMAN_BASE_URL",
                "https://visual.volcengineapi.com/omnihuman",
            ),
            stable_avatar: env_url(
                "STABLE_AVATAR_BASE_URL",
                "https://api.runpod.ai/v2/stable-avatar",
            ),
            topview: env_url("TOPVIEW_BASE_URL", "https://api.topview.ai"),
            cicada: env_url("CICADA_BASE_URL", "https://api.cicada.ai/v1"),
            fish_audio: env_url("FISH_AUDIO_BASE_URL", "https://api.fish.audio"),
        }
    }

    /// Point every vendor at the same base URL. Used against fake servers.
    pub fn uniform(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            chanjing: base.clone(),
            hedra: base.clone(),
            omnihuman: base.clone(),
            stable_avatar: base.clone(),
            topview: base.clone(),
            cicada: base.clone(),
            fish_audio: base,
        }
    }
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.into())
        .trim_end_matches('/')
        .to_string()
}

/// One client per vendor sharing a single connection pool.
#[derive(Clone)]
pub struct VendorClients {
    pub chanjing: ChanjingClient,
    pub hedra: HedraClient,
    pub omnihuman: OmnihumanClient,
    pub stable_avatar: StableAvatarClient,
    pub topview: TopViewClient,
    pub voice_clone: VoiceCloneClient,
}

impl VendorClients {
    pub fn new(endpoints: &VendorEndpoints) -> Self {
        Self::with_client(reqwest::Client::new(), endpoints)
    }

    pub fn with_client(client: reqwest::Client, endpoints: &VendorEndpoints) -> Self {
        Self {
            chanjing: ChanjingClient::new(client.clone(), endpoints.chanjing.clone()),
            hedra: HedraClient::new(client.clone(), endpoints.hedra.clone()),
            omnihuman: OmnihumanClient::new(client.clone(), endpoints.omnihuman.clone()),
            stable_avatar: StableAvatarClient::new(client.clone(), endpoints.stable_avatar.clone()),
            topview: TopViewClient::new(client.clone(), endpoints.topview.clone()),
            voice_clone: VoiceCloneClient::new(
                client,
                endpoints.cicada.clone(),
                endpoints.fish_audio.clone(),
            ),
        }
    }
}
