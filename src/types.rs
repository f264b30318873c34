//! Backend schema: one canonical record per table plus a partial update variant.
//!
//! Records mirror the hosted database rows. The presentation layer only reads
//! them, so every record derives `Deserialize`; the `*Patch` types are the
//! update shape (every field optional, absent fields never serialized) and can
//! be applied to a record in place.
//!
//! Enum columns serialize to their exact, case-sensitive schema literals.
//! Array columns decode to an empty `Vec` when the column is absent or `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a schema enum with its literal set, display labels and parsing.
macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $literal:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The schema literal stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }

            /// Human-facing label for badges and filter dropdowns.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

schema_enum! {
    JobType, "job_type" {
        FullTime => "full-time", "Full-time";
        PartTime => "part-time", "Part-time";
        Contract => "contract", "Contract";
        Internship => "internship", "Internship";
    }
}

schema_enum! {
    ExperienceLevel, "experience_level" {
        EntryLevel => "entry-level", "Entry level";
        Associate => "associate", "Associate";
        MidSenior => "mid-senior", "Mid-Senior level";
        Director => "director", "Director";
        Executive => "executive", "Executive";
    }
}

schema_enum! {
    WorkMode, "work_mode" {
        OnSite => "on-site", "On-site";
        Remote => "remote", "Remote";
        Hybrid => "hybrid", "Hybrid";
    }
}

schema_enum! {
    WebinarStatus, "webinar_status" {
        Upcoming => "upcoming", "Upcoming";
        Live => "live", "Live";
        Recorded => "recorded", "Recorded";
    }
}

schema_enum! {
    BlogCategory, "blog_category" {
        CareerAdvice => "career-advice", "Career advice";
        InterviewTips => "interview-tips", "Interview tips";
        TechTrends => "tech-trends", "Tech trends";
        IndustryNews => "industry-news", "Industry news";
    }
}

schema_enum! {
    ServiceCategory, "service_category" {
        ResumeReview => "resume-review", "Resume review";
        MockInterview => "mock-interview", "Mock interview";
        CareerCoaching => "career-coaching", "Career coaching";
        SkillDevelopment => "skill-development", "Skill development";
    }
}

schema_enum! {
    UserRole, "user_role" {
        JobSeeker => "job_seeker", "Job seeker";
        Employer => "employer", "Employer";
        Admin => "admin", "Admin";
    }
}

/// Array columns: absent and `null` both decode to an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_role() -> UserRole {
    UserRole::JobSeeker
}

/// A job posting. Descriptive text columns default to empty so a row with a
/// missing title still renders (the card substitutes a placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub employer_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub work_mode: WorkMode,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Job {
    pub fn has_salary(&self) -> bool {
        crate::format::salary_present(self.salary_min) || crate::format::salary_present(self.salary_max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webinar {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub speaker_name: Option<String>,
    #[serde(default)]
    pub speaker_bio: Option<String>,
    pub webinar_date: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default = "default_webinar_status")]
    pub status: WebinarStatus,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub replay_link: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_webinar_status() -> WebinarStatus {
    WebinarStatus::Upcoming
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    pub category: BlogCategory,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ServiceCategory,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub applied_at: DateTime<Utc>,
    #[serde(default = "default_application_status")]
    pub status: String,
}

fn default_application_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebinarRegistration {
    pub id: String,
    pub webinar_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
}

// ============================================================================
// Partial update variants
// ============================================================================

/// Copies every present patch field onto the record.
macro_rules! apply_fields {
    ($record:expr, $patch:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if let Some(value) = $patch.$field {
                $record.$field = value;
            }
        )+
    };
}

/// Update shape for [`Profile`]. Nullable columns use `Option<Option<_>>`:
/// `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut Profile) {
        apply_fields!(profile, self, [full_name, avatar_url, role, updated_at]);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<WorkMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_link: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl JobPatch {
    pub fn apply(self, job: &mut Job) {
        apply_fields!(
            job,
            self,
            [
                employer_id,
                title,
                description,
                company_name,
                location,
                job_type,
                experience_level,
                work_mode,
                salary_min,
                salary_max,
                currency,
                tech_stack,
                application_link,
                posted_at,
                expires_at,
                is_active,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebinarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_bio: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webinar_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebinarStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replay_link: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<Option<String>>,
}

impl WebinarPatch {
    pub fn apply(self, webinar: &mut Webinar) {
        apply_fields!(
            webinar,
            self,
            [
                title,
                description,
                speaker_name,
                speaker_bio,
                webinar_date,
                duration_minutes,
                status,
                live_link,
                replay_link,
                thumbnail_url,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlogPostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BlogCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<Option<String>>,
}

impl BlogPostPatch {
    /// Rename a post; the slug follows the new title.
    pub fn retitle(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            slug: Some(crate::format::slugify(title)),
            ..Default::default()
        }
    }

    pub fn apply(self, post: &mut BlogPost) {
        apply_fields!(
            post,
            self,
            [
                title,
                slug,
                content,
                category,
                tags,
                thumbnail_url,
                published_at,
                is_published,
                seo_title,
                seo_description,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ServiceCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ServicePatch {
    pub fn apply(self, service: &mut Service) {
        apply_fields!(
            service,
            self,
            [name, description, category, price, currency, image_url, is_active]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl JobApplicationPatch {
    pub fn apply(self, application: &mut JobApplication) {
        apply_fields!(application, self, [status]);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebinarRegistrationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl WebinarRegistrationPatch {
    pub fn apply(self, registration: &mut WebinarRegistration) {
        apply_fields!(registration, self, [registered_at]);
    }
}

// ============================================================================
// Listing filters
// ============================================================================

/// Criteria for the `/jobs` listing. Every field is optional; present fields
/// combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFilters {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub work_mode: Option<WorkMode>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    /// Comma-separated in the query string.
    #[serde(default, deserialize_with = "comma_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub salary_min: Option<f64>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub salary_max: Option<f64>,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        *self == JobFilters::default()
    }
}

// Query-string fields arrive as strings; an empty form field means "unset".

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match blank_as_none(deserializer)? {
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}
