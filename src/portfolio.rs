//! Static profile data served by the read-only endpoints
//!
//! The bundle is loaded once at startup, either from the copy compiled into
//! the binary or from a JSON file named by `PORTFOLIO_DATA`, and shared
//! read-only between handlers. Field names follow the JSON the frontend
//! consumes, hence the mix of upper- and camel-case renames.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_BUNDLE: &str = include_str!("../data/portfolio.json");

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("failed to read portfolio data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed portfolio data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Personal {
    pub full_name: String,
    pub professional_title: String,
    pub tagline: String,
    pub about_description: String,
    pub profile_image_path: String,
    #[serde(default)]
    pub about_bg_image: Option<String>,
    #[serde(default)]
    pub hero_bg_image: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ContactInfo {
    pub email_address: String,
    #[serde(default)]
    pub secondary_email: Option<String>,
    pub location: String,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Skill {
    pub name: String,
    /// language, frontend, backend or tools
    pub category: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JourneyEntry {
    pub id: u32,
    /// education or work
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "INSTITUTION_NAME")]
    pub institution_name: String,
    #[serde(rename = "INSTITUTION_LOGO", default)]
    pub institution_logo: Option<String>,
    pub title: String,
    #[serde(rename = "YEAR_START")]
    pub year_start: String,
    #[serde(rename = "YEAR_END")]
    pub year_end: String,
    #[serde(rename = "ACHIEVEMENT_DETAILS", default)]
    pub achievement_details: Option<String>,
    pub description: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodingProfile {
    pub name: String,
    pub logo: String,
    pub profile_link: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id: u32,
    #[serde(rename = "PROJECT_TITLE")]
    pub title: String,
    #[serde(rename = "PROJECT_DESCRIPTION")]
    pub description: String,
    #[serde(rename = "PROJECT_IMAGE")]
    pub image: String,
    #[serde(rename = "TECHNOLOGIES_USED")]
    pub technologies: Vec<String>,
    #[serde(rename = "GITHUB_REPO_URL", default)]
    pub github_repo_url: Option<String>,
    #[serde(rename = "LIVE_DEMO_URL", default)]
    pub live_demo_url: Option<String>,
    #[serde(rename = "PROJECT_YEAR")]
    pub year: String,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
}

/// The complete profile bundle returned by `GET /api/portfolio`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub personal: Personal,
    pub contact: ContactInfo,
    pub skills: Vec<Skill>,
    pub journey: Vec<JourneyEntry>,
    #[serde(default)]
    pub coding_profiles: Vec<CodingProfile>,
    pub projects: Vec<Project>,
}

impl PortfolioData {
    /// Bundle compiled into the binary
    pub fn embedded() -> Result<Self, PortfolioError> {
        Ok(serde_json::from_str(EMBEDDED_BUNDLE)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// File bundle when a path is given, embedded bundle otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, PortfolioError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }
}
