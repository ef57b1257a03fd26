use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Requirements {
    pub minimum: Option<String>,
    pub recommended: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PriceOverview {
    pub currency: String,
    pub initial: i64,
    #[serde(rename = "final")]
    pub final_price: i64,
    pub discount_percent: i64,
    pub initial_formatted: String,
    pub final_formatted: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PackageGroup {
    pub name: String,
    pub title: String,
    pub description: String,
    pub selection_text: String,
    pub display_type: i64,
    pub subs: Vec<PackageSub>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PackageSub {
    #[serde(rename = "packageid")]
    pub package_id: i64,
    pub option_text: String,
    pub is_free_license: bool,
    pub price_in_cents_with_discount: i64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Platforms {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Screenshot {
    pub id: i64,
    pub path_thumbnail: String,
    pub path_full: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub thumbnail: String,
    pub dash_h264: Option<String>,
    pub hls_h264: Option<String>,
    pub highlight: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Genre {
    pub id: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Metacritic {
    pub score: Option<i64>,
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recommendations {
    pub total: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReleaseDate {
    pub coming_soon: bool,
    pub date: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Achievements {
    pub total: i64,
    pub highlighted: Vec<Achievement>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Achievement {
    pub name: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SupportInfo {
    pub url: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContentDescriptors {
    pub ids: Vec<i64>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Ratings {
    pub esrb: Option<RatingBody>,
    pub pegi: Option<RatingBody>,
    pub usk: Option<RatingBody>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RatingBody {
    pub rating: Option<String>,
    pub required_age: Option<String>,
    pub descriptors: Option<String>,
}

/// Descriptive record for one title as served by the remote catalog.
///
/// Field names follow the catalog's snake_case payload. Non-optional fields are
/// required: a payload missing one of them fails to decode as a whole.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(rename = "steam_appid")]
    pub steam_app_id: u64,
    pub required_age: String,
    pub is_free: bool,
    pub controller_support: Option<String>,
    pub dlc: Option<Vec<u64>>,

    pub detailed_description: String,
    pub about_the_game: String,
    pub short_description: String,
    pub supported_languages: Option<String>,

    pub header_image: String,
    pub capsule_image: String,
    #[serde(rename = "capsule_imagev5")]
    pub capsule_image_v5: Option<String>,
    pub website: Option<String>,

    pub pc_requirements: Option<Requirements>,
    pub mac_requirements: Option<Requirements>,
    pub linux_requirements: Option<Requirements>,

    pub legal_notice: Option<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,

    pub price_overview: Option<PriceOverview>,
    pub packages: Option<Vec<u64>>,
    pub package_groups: Option<Vec<PackageGroup>>,

    pub platforms: Platforms,
    pub metacritic: Option<Metacritic>,

    pub categories: Vec<Category>,
    pub genres: Option<Vec<Genre>>,

    pub screenshots: Option<Vec<Screenshot>>,
    pub movies: Option<Vec<Movie>>,

    pub recommendations: Option<Recommendations>,
    pub achievements: Option<Achievements>,
    pub release_date: ReleaseDate,
    pub support_info: Option<SupportInfo>,

    pub background: Option<String>,
    pub background_raw: Option<String>,

    pub content_descriptors: Option<ContentDescriptors>,
    pub ratings: Option<Ratings>,
}

impl CatalogEntry {
    pub fn app_id(&self) -> String {
        self.steam_app_id.to_string()
    }
}

/// Envelope returned by both catalog endpoints.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogResponse {
    pub data: Vec<CatalogEntry>,
}
