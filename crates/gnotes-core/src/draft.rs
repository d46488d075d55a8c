//! Note draft: the state behind the create/edit form.
//!
//! A draft validates itself, owns the tag input rules, and guards its
//! fields against stale AI output. Each editable field carries a revision
//! counter that every edit bumps. An AI request captures the revision when
//! it starts ([`NoteDraft::begin_ai`]); its result is applied only if the
//! field is still at that revision ([`NoteDraft::apply_ai`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::TITLE_MAX_CHARS;
use crate::error::{Error, Result};
use crate::models::{NewNote, Note, NoteUpdate};
use crate::tags;

/// Hint shown next to a disabled submit button.
pub const SUBMIT_HINT: &str = "Please fill in title, content, and at least one tag";

/// A single reason a draft cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    TitleRequired,
    TitleTooLong,
    ContentRequired,
    TagsRequired,
}

impl ValidationIssue {
    /// Field the issue belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationIssue::TitleRequired | ValidationIssue::TitleTooLong => "title",
            ValidationIssue::ContentRequired => "content",
            ValidationIssue::TagsRequired => "tags",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::TitleRequired => "Title is required".to_string(),
            ValidationIssue::TitleTooLong => {
                format!("Title must be at most {} characters", TITLE_MAX_CHARS)
            }
            ValidationIssue::ContentRequired => "Content is required".to_string(),
            ValidationIssue::TagsRequired => "At least one tag is required".to_string(),
        }
    }
}

/// Draft fields that AI actions can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Content,
    Shorthand,
}

impl DraftField {
    fn index(self) -> usize {
        match self {
            DraftField::Title => 0,
            DraftField::Content => 1,
            DraftField::Shorthand => 2,
        }
    }
}

/// Captured field revision for a pending AI result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftTicket {
    field: DraftField,
    revision: u64,
}

/// Form state for creating or editing a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub shorthand: String,
    #[serde(skip)]
    editing: Option<Uuid>,
    #[serde(skip)]
    revisions: [u64; 3],
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing note, submitting as an update.
    pub fn for_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            editing: Some(note.id),
            ..Self::default()
        }
    }

    /// Id of the note being edited, if any.
    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.bump(DraftField::Title);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.bump(DraftField::Content);
    }

    pub fn set_shorthand(&mut self, shorthand: impl Into<String>) {
        self.shorthand = shorthand.into();
        self.bump(DraftField::Shorthand);
    }

    /// Add a tag from the tag input. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        tags::add_tag(&mut self.tags, raw)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        tags::remove_tag(&mut self.tags, tag)
    }

    /// Every reason the draft cannot be submitted, in field order.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(ValidationIssue::TitleRequired);
        } else if self.title.trim().chars().count() > TITLE_MAX_CHARS {
            issues.push(ValidationIssue::TitleTooLong);
        }
        if self.content.trim().is_empty() {
            issues.push(ValidationIssue::ContentRequired);
        }
        if tags::sanitize_tags(&self.tags).is_empty() {
            issues.push(ValidationIssue::TagsRequired);
        }
        issues
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.validate().is_empty()
    }

    /// Auto-title needs content to work from.
    pub fn can_auto_title(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Expansion needs shorthand to work from.
    pub fn can_expand(&self) -> bool {
        !self.shorthand.trim().is_empty()
    }

    /// Fail with every validation message joined, or succeed.
    pub fn check(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = issues.iter().map(|i| i.message()).collect();
        Err(Error::InvalidInput(messages.join("; ")))
    }

    pub fn to_new_note(&self) -> Result<NewNote> {
        self.check()?;
        Ok(NewNote {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            tags: tags::sanitize_tags(&self.tags),
            created_at: None,
        })
    }

    pub fn to_update(&self) -> Result<NoteUpdate> {
        self.check()?;
        Ok(NoteUpdate {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            tags: tags::sanitize_tags(&self.tags),
        })
    }

    /// Reset to an empty create-mode draft.
    pub fn clear(&mut self) {
        let revisions = self.revisions;
        *self = Self::default();
        // keep counters monotonic so outstanding tickets stay stale
        self.revisions = revisions;
        for field in [DraftField::Title, DraftField::Content, DraftField::Shorthand] {
            self.bump(field);
        }
    }

    /// Start an AI action that will write to `field`.
    pub fn begin_ai(&self, field: DraftField) -> DraftTicket {
        DraftTicket {
            field,
            revision: self.revisions[field.index()],
        }
    }

    /// Apply AI output if the field was not edited since `ticket` was taken.
    ///
    /// Returns `false` and leaves the draft untouched for a stale ticket.
    pub fn apply_ai(&mut self, ticket: DraftTicket, text: impl Into<String>) -> bool {
        if self.revisions[ticket.field.index()] != ticket.revision {
            return false;
        }
        match ticket.field {
            DraftField::Title => self.set_title(text),
            DraftField::Content => self.set_content(text),
            DraftField::Shorthand => self.set_shorthand(text),
        }
        true
    }

    fn bump(&mut self, field: DraftField) {
        self.revisions[field.index()] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_draft() -> NoteDraft {
        let mut draft = NoteDraft::new();
        draft.set_title("Groceries");
        draft.set_content("milk, eggs");
        draft.add_tag("home");
        draft
    }

    #[test]
    fn test_valid_draft_can_submit() {
        let draft = valid_draft();
        assert!(draft.validate().is_empty());
        assert!(draft.can_submit());
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let draft = NoteDraft::new();
        assert_eq!(
            draft.validate(),
            vec![
                ValidationIssue::TitleRequired,
                ValidationIssue::ContentRequired,
                ValidationIssue::TagsRequired,
            ]
        );
        assert!(!draft.can_submit());
    }

    #[test]
    fn test_whitespace_only_fields_are_missing() {
        let mut draft = valid_draft();
        draft.set_title("   ");
        draft.set_content("\n\t");
        let issues = draft.validate();
        assert!(issues.contains(&ValidationIssue::TitleRequired));
        assert!(issues.contains(&ValidationIssue::ContentRequired));
        assert!(!issues.contains(&ValidationIssue::TagsRequired));
    }

    #[test]
    fn test_missing_tags_blocks_submit() {
        let mut draft = valid_draft();
        draft.remove_tag("home");
        assert_eq!(draft.validate(), vec![ValidationIssue::TagsRequired]);
        assert_eq!(
            draft.validate()[0].message(),
            "At least one tag is required"
        );
    }

    #[test]
    fn test_title_length_limit() {
        let mut draft = valid_draft();
        draft.set_title("x".repeat(TITLE_MAX_CHARS));
        assert!(draft.can_submit());
        draft.set_title("x".repeat(TITLE_MAX_CHARS + 1));
        assert_eq!(draft.validate(), vec![ValidationIssue::TitleTooLong]);
    }

    #[test]
    fn test_title_limit_ignores_surrounding_whitespace() {
        let mut draft = valid_draft();
        draft.set_title(format!("  {}  ", "x".repeat(TITLE_MAX_CHARS - 1)));
        assert!(draft.validate().is_empty());
        assert_eq!(
            draft.to_new_note().unwrap().title.chars().count(),
            TITLE_MAX_CHARS - 1
        );
    }

    #[test]
    fn test_check_joins_messages() {
        let err = NoteDraft::new().check().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Title is required"));
        assert!(msg.contains("Content is required"));
        assert!(msg.contains("At least one tag is required"));
    }

    #[test]
    fn test_to_new_note_sanitizes_tags() {
        let mut draft = valid_draft();
        draft.tags.push(" home ".to_string());
        draft.tags.push("".to_string());
        let new_note = draft.to_new_note().unwrap();
        assert_eq!(new_note.tags, vec!["home"]);
        assert!(new_note.created_at.is_none());
    }

    #[test]
    fn test_for_note_targets_update() {
        let note = Note {
            id: Uuid::new_v4(),
            title: "Old".into(),
            content: "body".into(),
            tags: vec!["x".into()],
            created_at: Utc::now(),
            embedding: None,
        };
        let draft = NoteDraft::for_note(&note);
        assert_eq!(draft.editing_id(), Some(note.id));
        assert_eq!(draft.to_update().unwrap().title, "Old");
    }

    #[test]
    fn test_clear_resets_fields() {
        let mut draft = valid_draft();
        draft.set_shorthand("- a\n- b");
        draft.clear();
        assert!(draft.title.is_empty());
        assert!(draft.content.is_empty());
        assert!(draft.tags.is_empty());
        assert!(draft.shorthand.is_empty());
        assert!(draft.editing_id().is_none());
    }

    #[test]
    fn test_ai_result_applies_to_untouched_field() {
        let mut draft = valid_draft();
        let ticket = draft.begin_ai(DraftField::Title);
        assert!(draft.apply_ai(ticket, "Weekly Groceries"));
        assert_eq!(draft.title, "Weekly Groceries");
    }

    #[test]
    fn test_stale_ai_result_does_not_clobber_user_edit() {
        let mut draft = valid_draft();
        let ticket = draft.begin_ai(DraftField::Title);
        draft.set_title("My own title");
        assert!(!draft.apply_ai(ticket, "Generated title"));
        assert_eq!(draft.title, "My own title");
    }

    #[test]
    fn test_ticket_is_single_use() {
        let mut draft = valid_draft();
        let ticket = draft.begin_ai(DraftField::Content);
        assert!(draft.apply_ai(ticket, "first"));
        assert!(!draft.apply_ai(ticket, "second"));
        assert_eq!(draft.content, "first");
    }

    #[test]
    fn test_clear_invalidates_outstanding_tickets() {
        let mut draft = valid_draft();
        let ticket = draft.begin_ai(DraftField::Content);
        draft.clear();
        assert!(!draft.apply_ai(ticket, "late"));
        assert!(draft.content.is_empty());
    }

    #[test]
    fn test_ai_preconditions() {
        let mut draft = NoteDraft::new();
        assert!(!draft.can_auto_title());
        assert!(!draft.can_expand());
        draft.set_content("text");
        draft.set_shorthand("- bullet");
        assert!(draft.can_auto_title());
        assert!(draft.can_expand());
    }

    #[test]
    fn test_deserialize_from_form_json() {
        let draft: NoteDraft =
            serde_json::from_str(r#"{"title":"T","content":"C","tags":["a"]}"#).unwrap();
        assert!(draft.can_submit());
        assert!(draft.shorthand.is_empty());
    }
}
