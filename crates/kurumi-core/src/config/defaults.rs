//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Kurumi | Bot".to_string()
}

pub fn default_prefix() -> String {
    ".".to_string()
}

pub fn default_data_dir() -> String {
    ".".to_string()
}

pub fn default_log_level() -> String {
    "debug".to_string()
}

pub fn default_version() -> String {
    "2.0.0".to_string()
}

pub fn default_developer() -> String {
    "Arya Official".to_string()
}

pub fn default_mode() -> String {
    "Public".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_menu_video() -> String {
    "./assets/menu.mp4".to_string()
}

pub fn default_text_render() -> String {
    "https://dummyimage.com".to_string()
}

pub fn default_image_generation() -> String {
    "https://image.pollinations.ai".to_string()
}

pub fn default_neko_json() -> String {
    "https://nekos.best/api/v2/neko".to_string()
}

pub fn default_neko_fallback() -> String {
    "https://api.waifu.pics/sfw/neko".to_string()
}

pub fn default_image_size() -> u32 {
    768
}

pub fn default_text_render_secs() -> u64 {
    20
}

pub fn default_image_generation_secs() -> u64 {
    45
}

pub fn default_lookup_secs() -> u64 {
    12
}

pub fn default_media_secs() -> u64 {
    15
}

pub fn default_reconnect_delay() -> u64 {
    3
}
