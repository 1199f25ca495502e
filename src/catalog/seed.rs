use chrono::{TimeZone, Utc};

use super::model::{App, AppStatus};

/// Categories offered when no config overrides them.
pub const DEFAULT_CATEGORIES: &[&str] = &["工具", "开发", "娱乐", "生产力", "社交"];

/// Starter catalog installed when no stored collection exists.
pub fn seed_apps() -> Vec<App> {
    let entries = [
        (
            "1",
            "ai beauty rating",
            "Discover your beauty score instantly! Our free Beauty Score AI analyzes your face and reveals your attractiveness rating in seconds.",
            "工具",
            "https://www.aibeautyrating.online/",
            "🌐",
            true,
        ),
        (
            "2",
            "mii maker online",
            "Create your perfect Mii avatar for free online. No downloads, no registration required. Easy-to-use Mii character creator in your browser.",
            "开发",
            "https://miimaker.online/",
            "💻",
            false,
        ),
        (
            "3",
            "em dash symbol",
            "Em dash copy paste made simple! Instantly copy the em dash symbol with one click. Get detailed input guides for Windows, macOS, Android, iOS, plus HTML and CSS codes.",
            "娱乐",
            "https://emdashsymbol.com/",
            "🎵",
            false,
        ),
        (
            "4",
            "squared symbol",
            "Squared symbol copy paste made simple! Instantly copy the squared symbol with one click. Includes input guides for Windows, macOS, Android, iOS, plus HTML/CSS codes.",
            "工具",
            "https://squaredsymbol.org/",
            "🔣",
            false,
        ),
    ];

    entries
        .into_iter()
        .zip(1u32..)
        .filter_map(
            |((id, name, description, category, url, icon, favorite), day)| {
                let created_at = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).single()?;
                Some(App {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    category: category.to_string(),
                    url: url.to_string(),
                    icon: icon.to_string(),
                    status: AppStatus::Active,
                    created_at,
                    favorite,
                })
            },
        )
        .collect()
}
