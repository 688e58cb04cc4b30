//! User-facing localized messages for failures the platform itself reports.
//!
//! Vendor-supplied reasons are always passed through verbatim; these texts
//! are only used when the vendor gave no reason, when a request never reached
//! the vendor, or when polling ran out of attempts.

use crate::job::JobKind;

/// A message in every language the UI ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub cn: &'static str,
    pub en: &'static str,
    pub ja: &'static str,
}

pub const MISSING_PARAMETERS: Localized = Localized {
    cn: "缺少必要参数",
    en: "Missing required parameters",
    ja: "必須パラメータがありません",
};

pub const NETWORK_FAILURE: Localized = Localized {
    cn: "网络请求失败，请稍后重试",
    en: "Network request failed, please try again later",
    ja: "ネットワークリクエストに失敗しました。しばらくしてから再試行してください",
};

pub const NOT_FOUND: Localized = Localized {
    cn: "记录不存在",
    en: "The requested record does not exist",
    ja: "指定されたレコードが見つかりません",
};

pub const INTERNAL_FAILURE: Localized = Localized {
    cn: "服务器内部错误",
    en: "An internal error occurred",
    ja: "内部エラーが発生しました",
};

/// Shown when the vendor rejected a submission without a structured body.
pub fn submit_failed(kind: JobKind) -> Localized {
    match kind {
        JobKind::AvatarCreation => Localized {
            cn: "数字人形象创建失败",
            en: "Failed to create the avatar",
            ja: "アバターの作成に失敗しました",
        },
        JobKind::AudioSynthesis => Localized {
            cn: "音频生成失败",
            en: "Failed to create the audio",
            ja: "音声の作成に失敗しました",
        },
        JobKind::VideoGeneration => Localized {
            cn: "视频生成失败",
            en: "Failed to create the video",
            ja: "動画の作成に失敗しました",
        },
        JobKind::VoiceClone => Localized {
            cn: "声音克隆失败",
            en: "Failed to clone the voice",
            ja: "音声クローンに失敗しました",
        },
    }
}

/// Shown when the vendor reported a failure mid-poll without a reason.
pub fn task_failed(kind: JobKind) -> Localized {
    match kind {
        JobKind::AvatarCreation => Localized {
            cn: "服务商报告数字人形象生成失败",
            en: "The vendor reported that avatar creation failed",
            ja: "ベンダーがアバター作成の失敗を報告しました",
        },
        JobKind::AudioSynthesis => Localized {
            cn: "服务商报告音频生成失败",
            en: "The vendor reported that audio synthesis failed",
            ja: "ベンダーが音声合成の失敗を報告しました",
        },
        JobKind::VideoGeneration => Localized {
            cn: "服务商报告视频生成失败",
            en: "The vendor reported that video generation failed",
            ja: "ベンダーが動画生成の失敗を報告しました",
        },
        JobKind::VoiceClone => Localized {
            cn: "服务商报告声音克隆失败",
            en: "The vendor reported that voice cloning failed",
            ja: "ベンダーが音声クローンの失敗を報告しました",
        },
    }
}

/// Shown when the attempt ceiling ran out before a terminal state.
pub fn timed_out(kind: JobKind) -> Localized {
    match kind {
        JobKind::AvatarCreation => Localized {
            cn: "数字人形象生成耗时过长，请稍后查看",
            en: "Avatar creation took too long, please check back later",
            ja: "アバターの作成に時間がかかりすぎています。後でもう一度確認してください",
        },
        JobKind::AudioSynthesis => Localized {
            cn: "音频生成耗时过长，请稍后重试",
            en: "Audio synthesis took too long, please try again later",
            ja: "音声合成に時間がかかりすぎています。後でもう一度お試しください",
        },
        JobKind::VideoGeneration => Localized {
            cn: "视频生成耗时过长，请稍后查看",
            en: "Video generation took too long, please check back later",
            ja: "動画生成に時間がかかりすぎています。後でもう一度確認してください",
        },
        JobKind::VoiceClone => Localized {
            cn: "声音克隆耗时过长，请稍后查看",
            en: "Voice cloning took too long, please check back later",
            ja: "音声クローンに時間がかかりすぎています。後でもう一度確認してください",
        },
    }
}
