//! DMCA notice templates: an in-memory, id-keyed store plus `{{token}}`
//! placeholder rendering.
//!
//! Templates are not persisted. The API layer keeps one [`DmcaTemplateStore`]
//! behind a lock for the lifetime of the process.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::TimeZone;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix for generated template ids.
pub const TEMPLATE_ID_PREFIX: &str = "dmca-";

/// Regex pattern matching `{{token}}` placeholders (inner whitespace allowed).
pub const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Token for the copyright owner's name.
pub const TOKEN_USER_NAME: &str = "userName";
/// Token for the infringing content URL.
pub const TOKEN_CONTENT_URL: &str = "contentURL";
/// Token for the platform receiving the notice.
pub const TOKEN_PLATFORM: &str = "platform";

/// Value substituted for the owner's name when the caller does not supply one.
pub const OWNER_NAME_FALLBACK: &str = "[COPYRIGHT OWNER NAME]";

/// Body used when no template exists for a takedown's platform.
pub const GENERIC_NOTICE_TEMPLATE: &str = "DMCA Takedown Notice

To Whom It May Concern at {{platform}},

I am writing to notify you that my copyrighted content has been posted to your platform without my authorization.

Content URL: {{contentURL}}

I have a good faith belief that the use of the material in the manner complained of is not authorized by me, the copyright owner.

Please remove this content immediately.

Sincerely,
{{userName}}";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A reusable notice body for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmcaTemplate {
    pub id: String,
    pub platform: String,
    pub subject: String,
    pub template: String,
    pub last_modified: Timestamp,
}

/// Fields supplied when creating or editing a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDraft {
    pub platform: String,
    pub subject: String,
    pub template: String,
}

/// A template rendered against concrete values.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNotice {
    pub subject: String,
    pub body: String,
    /// Placeholders left in the body because no value was supplied.
    pub unresolved: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Platform, subject and body must all be non-blank.
pub fn validate_draft(draft: &TemplateDraft) -> Result<(), CoreError> {
    let missing: Vec<&str> = [
        ("platform", &draft.platform),
        ("subject", &draft.subject),
        ("template", &draft.template),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Placeholder rendering
// ---------------------------------------------------------------------------

/// Names of the `{{token}}` placeholders in `text`, de-duplicated in order of
/// first appearance.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute known placeholders. Unknown ones are left untouched.
pub fn render(text: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Render both subject and body of a template.
pub fn render_template(template: &DmcaTemplate, values: &HashMap<String, String>) -> RenderedNotice {
    let body = render(&template.template, values);
    let unresolved = extract_placeholders(&body);
    RenderedNotice {
        subject: render(&template.subject, values),
        body,
        unresolved,
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Ordered in-memory template collection.
#[derive(Debug, Default)]
pub struct DmcaTemplateStore {
    templates: Vec<DmcaTemplate>,
}

impl DmcaTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the YouTube, Instagram and TikTok notices.
    pub fn with_defaults() -> Self {
        Self {
            templates: default_templates(),
        }
    }

    pub fn list(&self) -> &[DmcaTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&DmcaTemplate, CoreError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// First template whose platform matches, ignoring case.
    pub fn find_for_platform(&self, platform: &str) -> Option<&DmcaTemplate> {
        self.templates
            .iter()
            .find(|t| t.platform.eq_ignore_ascii_case(platform.trim()))
    }

    /// Distinct platforms covered by at least one template.
    pub fn platforms(&self) -> Vec<String> {
        let mut platforms: Vec<String> = Vec::new();
        for t in &self.templates {
            if !platforms.contains(&t.platform) {
                platforms.push(t.platform.clone());
            }
        }
        platforms
    }

    pub fn create(&mut self, draft: TemplateDraft, now: Timestamp) -> Result<DmcaTemplate, CoreError> {
        validate_draft(&draft)?;
        let template = DmcaTemplate {
            id: self.next_id(now),
            platform: draft.platform.trim().to_string(),
            subject: draft.subject.trim().to_string(),
            template: draft.template,
            last_modified: now,
        };
        self.templates.push(template.clone());
        Ok(template)
    }

    /// Replace a template's fields in place, keeping its id and position.
    pub fn update(
        &mut self,
        id: &str,
        draft: TemplateDraft,
        now: Timestamp,
    ) -> Result<DmcaTemplate, CoreError> {
        validate_draft(&draft)?;
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        slot.platform = draft.platform.trim().to_string();
        slot.subject = draft.subject.trim().to_string();
        slot.template = draft.template;
        slot.last_modified = now;
        Ok(slot.clone())
    }

    /// The body text, for copying elsewhere. Does not modify the store.
    pub fn copy_body(&self, id: &str) -> Result<String, CoreError> {
        self.get(id).map(|t| t.template.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<DmcaTemplate, CoreError> {
        let pos = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.templates.remove(pos))
    }

    /// `dmca-<millis>`, bumped until unused.
    fn next_id(&self, now: Timestamp) -> String {
        let mut stamp = now.timestamp_millis();
        loop {
            let candidate = format!("{TEMPLATE_ID_PREFIX}{stamp}");
            if !self.templates.iter().any(|t| t.id == candidate) {
                return candidate;
            }
            stamp += 1;
        }
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::KeyNotFound {
        entity: "DmcaTemplate",
        key: id.to_string(),
    }
}

fn seed_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    chrono::Utc
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn default_templates() -> Vec<DmcaTemplate> {
    vec![
        DmcaTemplate {
            id: "dmca-001".to_string(),
            platform: "YouTube".to_string(),
            subject: "Copyright Infringement Notification - YouTube".to_string(),
            template: "DMCA Takedown Notice

To Whom It May Concern at YouTube,

I am writing to notify you that my copyrighted content has been posted to your platform without my authorization.

Content URL: {{contentURL}}

The unauthorized content was posted by: {{contentOwner}}

I have a good faith belief that the use of the material in the manner complained of is not authorized by me, the copyright owner.

The information in this notification is accurate, and under penalty of perjury, I am the owner, or an agent authorized to act on behalf of the owner, of an exclusive right that is allegedly infringed.

Please remove this content immediately.

Sincerely,
{{userName}}"
                .to_string(),
            last_modified: seed_time(2023, 4, 1, 10, 30),
        },
        DmcaTemplate {
            id: "dmca-002".to_string(),
            platform: "Instagram".to_string(),
            subject: "Copyright Infringement Notice - Instagram".to_string(),
            template: "DMCA Takedown Notice

To Whom It May Concern at Instagram,

I am the copyright owner of the content that was posted to your platform without my authorization.

Infringing Content URL: {{contentURL}}

Original Work URL or Description: {{originalWorkDescription}}

I have a good faith belief that use of the copyrighted materials described above as allegedly infringing is not authorized by the copyright owner, its agent, or the law.

I swear, under penalty of perjury, that the information in the notification is accurate and that I am the copyright owner or am authorized to act on behalf of the owner of an exclusive right that is allegedly infringed.

Please act expeditiously to remove the infringing content.

Sincerely,
{{userName}}"
                .to_string(),
            last_modified: seed_time(2023, 4, 2, 15, 45),
        },
        DmcaTemplate {
            id: "dmca-003".to_string(),
            platform: "TikTok".to_string(),
            subject: "DMCA Takedown Request - TikTok".to_string(),
            template: "DMCA Takedown Notice

To TikTok Legal Department,

This letter serves as notification under the Digital Millennium Copyright Act that my copyrighted work has been infringed.

The infringing content can be found at: {{contentURL}}

My original work can be found at or described as: {{originalWorkDescription}}

I have a good faith belief that use of the copyrighted materials described above on the infringing web pages is not authorized by the copyright owner, its agent, or the law.

I swear, under penalty of perjury, that the information in this notification is accurate and that I am the copyright owner, or am authorized to act on behalf of the owner, of an exclusive right that is allegedly infringed.

Thank you for your prompt attention to this matter.

Sincerely,
{{userName}}"
                .to_string(),
            last_modified: seed_time(2023, 4, 3, 11, 20),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn draft(platform: &str, subject: &str, body: &str) -> TemplateDraft {
        TemplateDraft {
            platform: platform.to_string(),
            subject: subject.to_string(),
            template: body.to_string(),
        }
    }

    fn at(millis: i64) -> Timestamp {
        chrono::DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn defaults_cover_three_platforms() {
        let store = DmcaTemplateStore::with_defaults();
        assert_eq!(store.len(), 3);
        assert_eq!(store.platforms(), vec!["YouTube", "Instagram", "TikTok"]);
        assert!(store.find_for_platform("youtube").is_some());
        assert!(store.find_for_platform("Reddit").is_none());
    }

    #[test]
    fn create_requires_all_fields() {
        let mut store = DmcaTemplateStore::new();
        let err = store.create(draft("Reddit", " ", "body"), at(1)).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("subject"));
        assert!(store.is_empty());
    }

    #[test]
    fn create_assigns_timestamp_id() {
        let mut store = DmcaTemplateStore::new();
        let t = store
            .create(draft("Reddit", "Notice - Reddit", "Hi {{userName}}"), at(1_700_000_000_000))
            .unwrap();
        assert_eq!(t.id, "dmca-1700000000000");
        assert_eq!(store.get(&t.id).unwrap().platform, "Reddit");
    }

    #[test]
    fn colliding_timestamps_still_get_unique_ids() {
        let mut store = DmcaTemplateStore::new();
        let a = store.create(draft("A", "s", "b"), at(5)).unwrap();
        let b = store.create(draft("B", "s", "b"), at(5)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(b.id, "dmca-6");
    }

    #[test]
    fn update_edits_in_place() {
        let mut store = DmcaTemplateStore::with_defaults();
        let updated = store
            .update("dmca-002", draft("Instagram", "New subject", "New body"), at(10))
            .unwrap();
        assert_eq!(updated.subject, "New subject");
        assert_eq!(updated.last_modified, at(10));
        assert_eq!(store.list()[1].id, "dmca-002");
        assert_eq!(store.list()[1].template, "New body");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = DmcaTemplateStore::new();
        assert_matches!(
            store.update("dmca-missing", draft("a", "b", "c"), at(1)),
            Err(CoreError::KeyNotFound { .. })
        );
    }

    #[test]
    fn copy_does_not_change_state() {
        let store = DmcaTemplateStore::with_defaults();
        let before = store.list().to_vec();
        let body = store.copy_body("dmca-003").unwrap();
        assert!(body.starts_with("DMCA Takedown Notice"));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn delete_removes_template() {
        let mut store = DmcaTemplateStore::with_defaults();
        let removed = store.delete("dmca-001").unwrap();
        assert_eq!(removed.platform, "YouTube");
        assert_eq!(store.len(), 2);
        assert!(store.get("dmca-001").is_err());
        assert!(store.delete("dmca-001").is_err());
    }

    #[test]
    fn placeholders_in_first_appearance_order() {
        let names = extract_placeholders("{{b}} {{ a }} {{b}} {not} {{c_1}}");
        assert_eq!(names, vec!["b", "a", "c_1"]);
    }

    #[test]
    fn render_leaves_unknown_tokens() {
        let values = HashMap::from([
            (TOKEN_USER_NAME.to_string(), "Jane".to_string()),
            (TOKEN_CONTENT_URL.to_string(), "https://yt/x".to_string()),
        ]);
        let out = render("{{userName}} / {{contentURL}} / {{other}}", &values);
        assert_eq!(out, "Jane / https://yt/x / {{other}}");
    }

    #[test]
    fn render_template_reports_unresolved() {
        let store = DmcaTemplateStore::with_defaults();
        let values = HashMap::from([
            (TOKEN_USER_NAME.to_string(), "Jane".to_string()),
            (TOKEN_CONTENT_URL.to_string(), "https://yt/x".to_string()),
        ]);
        let notice = render_template(store.get("dmca-001").unwrap(), &values);
        assert!(notice.body.contains("Content URL: https://yt/x"));
        assert!(notice.body.ends_with("Jane"));
        assert_eq!(notice.unresolved, vec!["contentOwner"]);
    }

    #[test]
    fn generic_notice_uses_platform_token() {
        let values = HashMap::from([(TOKEN_PLATFORM.to_string(), "Reddit".to_string())]);
        let out = render(GENERIC_NOTICE_TEMPLATE, &values);
        assert!(out.contains("To Whom It May Concern at Reddit,"));
    }
}
