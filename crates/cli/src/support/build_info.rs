#![forbid(unsafe_code)]

pub(crate) fn build_profile_label() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

pub(crate) fn build_git_sha() -> Option<&'static str> {
    option_env!("FEATURE_LOOKUP_GIT_SHA").and_then(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { Some(v) }
    })
}

pub(crate) fn build_fingerprint() -> String {
    match build_git_sha() {
        Some(sha) => format!("{}+{sha}", build_profile_label()),
        None => build_profile_label().to_string(),
    }
}
