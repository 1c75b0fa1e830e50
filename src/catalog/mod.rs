pub mod search;

pub use search::{Catalog, CatalogClient, CatalogError};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One quality-tagged link (artwork or audio stream)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub quality: String,
    pub link: String,
}

/// Catalog record as returned by the search API 🎵
///
/// Identity is `id` only. Liked songs and playlists store their own copy of the
/// full record, so nothing here is ever shared or mutated after fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_artists")]
    pub primary_artists: String,
    /// Seconds
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: u64,
    #[serde(default, deserialize_with = "lenient_links")]
    pub image: Vec<Link>,
    #[serde(default, deserialize_with = "lenient_links")]
    pub download_url: Vec<Link>,
}

impl Song {
    pub fn artist(&self) -> &str {
        let artists = self.primary_artists.trim();
        if artists.is_empty() {
            "Unknown Artist"
        } else {
            artists
        }
    }

    /// Row label, e.g. `3:07`
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration / 60, self.duration % 60)
    }

    pub fn image_url(&self, quality: &str) -> Option<&str> {
        find_link(&self.image, quality)
    }

    pub fn audio_url(&self, quality: &str) -> Option<&str> {
        find_link(&self.download_url, quality)
    }
}

fn find_link<'a>(links: &'a [Link], quality: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|l| l.quality == quality && !l.link.is_empty())
        .map(|l| l.link.as_str())
}

// The catalog is loose about types: ids arrive as numbers or strings,
// durations as "245" or 245, artists as "A, B" or ["A", "B"].

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid song id: {}", other))),
    }
}

fn lenient_artists<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    })
}

fn lenient_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f.max(0.0) as u64).unwrap_or(0),
        _ => 0,
    })
}

fn lenient_links<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Link>, D::Error> {
    // `false` or a bare string shows up for songs without variants
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Link>(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_song() {
        let raw = r#"{
            "id": "abc123",
            "name": "Sky Full",
            "primaryArtists": "Band A, Band B",
            "duration": "187",
            "image": [{"quality": "150x150", "link": "http://img/s.jpg"},
                      {"quality": "500x500", "link": "http://img/l.jpg"}],
            "downloadUrl": [{"quality": "96kbps", "link": "http://a/96.mp4"},
                            {"quality": "320kbps", "link": "http://a/320.mp4"}]
        }"#;
        let song: Song = serde_json::from_str(raw).unwrap();

        assert_eq!(song.id, "abc123");
        assert_eq!(song.artist(), "Band A, Band B");
        assert_eq!(song.duration, 187);
        assert_eq!(song.duration_label(), "3:07");
        assert_eq!(song.image_url("150x150"), Some("http://img/s.jpg"));
        assert_eq!(song.audio_url("320kbps"), Some("http://a/320.mp4"));
        assert_eq!(song.audio_url("160kbps"), None);
    }

    #[test]
    fn test_numeric_id_and_missing_fields() {
        let song: Song = serde_json::from_str(r#"{"id": 42, "name": "X", "downloadUrl": false}"#).unwrap();

        assert_eq!(song.id, "42");
        assert_eq!(song.artist(), "Unknown Artist");
        assert_eq!(song.duration, 0);
        assert_eq!(song.duration_label(), "0:00");
        assert!(song.download_url.is_empty());
    }

    #[test]
    fn test_artist_array() {
        let song: Song =
            serde_json::from_str(r#"{"id": "1", "primaryArtists": ["A", {"name": "B"}], "duration": 61}"#)
                .unwrap();
        assert_eq!(song.primary_artists, "A, B");
        assert_eq!(song.duration_label(), "1:01");
    }

    #[test]
    fn test_store_shape_is_stable() {
        let song: Song = serde_json::from_str(r#"{"id": "7", "name": "Y", "duration": 10}"#).unwrap();
        let json = serde_json::to_value(&song).unwrap();

        assert!(json.get("primaryArtists").is_some());
        assert!(json.get("downloadUrl").is_some());
        let back: Song = serde_json::from_value(json).unwrap();
        assert_eq!(back, song);
    }
}
