use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

pub fn get_asset(path: &str) -> Option<std::borrow::Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_is_embedded() {
        let css = get_asset("style.css").expect("style.css should be embedded");
        assert!(String::from_utf8_lossy(&css).contains(".map-surface"));
    }

    #[test]
    fn test_missing_asset() {
        assert!(get_asset("nope.css").is_none());
    }
}
