//! Project create/edit form.
//!
//! The form only collects and validates fields; it never talks to the
//! network. Submitting yields a [`ProjectPayload`] that callers wrap into a
//! `ProjectAction::Add` or `ProjectAction::Update`.

use crate::model::Project;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum project name length, in characters.
pub const NAME_MAX_CHARS: usize = 20;
/// Maximum description length, in characters.
pub const DESC_MAX_CHARS: usize = 40;

/// Field rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Name left empty.
    #[error("project name is required")]
    NameRequired,
    /// Name longer than [`NAME_MAX_CHARS`].
    #[error("project name is {len} characters long (max {max})")]
    NameTooLong {
        /// Actual length.
        len: usize,
        /// Allowed length.
        max: usize,
    },
    /// Description longer than [`DESC_MAX_CHARS`].
    #[error("project description is {len} characters long (max {max})")]
    DescTooLong {
        /// Actual length.
        len: usize,
        /// Allowed length.
        max: usize,
    },
    /// No cover image selected.
    #[error("a cover image must be selected")]
    CoverRequired,
}

/// Whether the form creates a new project or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Creating a project.
    Create,
    /// Editing an existing project.
    Edit,
}

/// Payload emitted on a valid submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    /// Project name.
    pub name: String,
    /// Description, `None` when left blank.
    pub desc: Option<String>,
    /// Selected cover image.
    pub cover_img: String,
}

impl ProjectPayload {
    /// Build a not-yet-persisted project from this payload.
    #[must_use]
    pub fn into_project(self) -> Project {
        Project {
            name: self.name,
            desc: self.desc,
            cover_img: self.cover_img,
            ..Project::default()
        }
    }

    /// Overlay the payload on an existing project, keeping its id, lists and members.
    #[must_use]
    pub fn apply_to(self, project: &Project) -> Project {
        Project {
            name: self.name,
            desc: self.desc,
            cover_img: self.cover_img,
            ..project.clone()
        }
    }
}

/// Field state of the project dialog.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    mode: FormMode,
    thumbnails: Vec<String>,
    /// Name input.
    pub name: String,
    /// Description input.
    pub desc: String,
    /// Selected cover image.
    pub cover_img: Option<String>,
}

impl ProjectForm {
    /// Empty form preselecting `default_cover`.
    #[must_use]
    pub fn create(default_cover: Option<String>, thumbnails: Vec<String>) -> Self {
        Self {
            mode: FormMode::Create,
            thumbnails,
            name: String::new(),
            desc: String::new(),
            cover_img: default_cover,
        }
    }

    /// Form prefilled from an existing project.
    #[must_use]
    pub fn edit(project: &Project, thumbnails: Vec<String>) -> Self {
        Self {
            mode: FormMode::Edit,
            thumbnails,
            name: project.name.clone(),
            desc: project.desc.clone().unwrap_or_default(),
            cover_img: Some(project.cover_img.clone()).filter(|cover| !cover.is_empty()),
        }
    }

    /// Create or edit.
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    /// Dialog title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create project:",
            FormMode::Edit => "Edit project:",
        }
    }

    /// Cover thumbnails offered for selection.
    #[must_use]
    pub fn thumbnails(&self) -> &[String] {
        &self.thumbnails
    }

    /// Every rule the current input violates.
    #[must_use]
    pub fn errors(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        let name_len = self.name.chars().count();
        if self.name.is_empty() {
            errors.push(FormError::NameRequired);
        } else if name_len > NAME_MAX_CHARS {
            errors.push(FormError::NameTooLong {
                len: name_len,
                max: NAME_MAX_CHARS,
            });
        }
        let desc_len = self.desc.chars().count();
        if desc_len > DESC_MAX_CHARS {
            errors.push(FormError::DescTooLong {
                len: desc_len,
                max: DESC_MAX_CHARS,
            });
        }
        if self.cover_img.as_deref().is_none_or(str::is_empty) {
            errors.push(FormError::CoverRequired);
        }
        errors
    }

    /// Whether submit would succeed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Validate and produce the payload.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn submit(&self) -> Result<ProjectPayload, FormError> {
        if let Some(err) = self.errors().into_iter().next() {
            return Err(err);
        }
        let cover_img = self.cover_img.clone().ok_or(FormError::CoverRequired)?;
        Ok(ProjectPayload {
            name: self.name.clone(),
            desc: Some(self.desc.clone()).filter(|desc| !desc.is_empty()),
            cover_img,
        })
    }
}

/// Thumbnail paths for the stock covers under `base`.
#[must_use]
pub fn cover_thumbnails(base: &str, count: usize) -> Vec<String> {
    let base = base.trim_end_matches('/');
    (0..count).map(|i| format!("{base}/covers/{i}_tn.jpg")).collect()
}

/// Full-size cover path for a thumbnail path.
#[must_use]
pub fn cover_from_thumbnail(thumbnail: &str) -> String {
    thumbnail.replacen("_tn", "", 1)
}

/// Cover preselected when creating a project.
#[must_use]
pub fn default_cover(thumbnails: &[String]) -> Option<String> {
    thumbnails.first().map(|thumb| cover_from_thumbnail(thumb))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::id::{ProjectId, UserId};

    fn thumbs() -> Vec<String> {
        cover_thumbnails("/assets/img", 3)
    }

    #[test]
    fn create_mode_preselects_default_cover() {
        let thumbnails = thumbs();
        let form = ProjectForm::create(default_cover(&thumbnails), thumbnails);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.title(), "Create project:");
        assert_eq!(form.cover_img.as_deref(), Some("/assets/img/covers/0.jpg"));
        assert_eq!(form.thumbnails().len(), 3);
    }

    #[test]
    fn name_is_required() {
        let form = ProjectForm::create(Some("cover.jpg".into()), vec![]);
        assert_eq!(form.submit(), Err(FormError::NameRequired));
        assert!(!form.is_valid());
    }

    #[test]
    fn whitespace_name_counts_as_present() {
        let mut form = ProjectForm::create(Some("cover.jpg".into()), vec![]);
        form.name = "   ".into();
        assert!(form.errors().is_empty());
        assert_eq!(form.submit().expect("valid form").name, "   ");
    }

    #[test]
    fn name_and_desc_limits_count_characters() {
        let mut form = ProjectForm::create(Some("cover.jpg".into()), vec![]);
        form.name = "项".repeat(NAME_MAX_CHARS);
        form.desc = "描".repeat(DESC_MAX_CHARS);
        assert!(form.is_valid());

        form.name.push('x');
        form.desc.push('x');
        assert_eq!(
            form.errors(),
            vec![
                FormError::NameTooLong { len: 21, max: 20 },
                FormError::DescTooLong { len: 41, max: 40 },
            ]
        );
    }

    #[test]
    fn cover_is_required() {
        let mut form = ProjectForm::create(None, vec![]);
        form.name = "Launch".into();
        assert_eq!(form.submit(), Err(FormError::CoverRequired));
    }

    #[test]
    fn empty_description_submits_as_none() {
        let mut form = ProjectForm::create(Some("cover.jpg".into()), vec![]);
        form.name = "Launch".into();
        let payload = form.submit().expect("valid form");
        assert_eq!(
            payload,
            ProjectPayload {
                name: "Launch".into(),
                desc: None,
                cover_img: "cover.jpg".into(),
            }
        );
    }

    #[test]
    fn edit_mode_prefills_and_keeps_identity() {
        let project = Project {
            id: Some(ProjectId::new("9")),
            name: "Old".into(),
            desc: Some("about".into()),
            cover_img: "old.jpg".into(),
            members: vec![UserId::new("1")],
            ..Project::default()
        };
        let mut form = ProjectForm::edit(&project, vec![]);
        assert_eq!(form.title(), "Edit project:");
        assert_eq!(form.desc, "about");

        form.name = "New".into();
        let updated = form.submit().expect("valid form").apply_to(&project);
        assert_eq!(updated.id, project.id);
        assert_eq!(updated.members, project.members);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.desc.as_deref(), Some("about"));
    }

    #[test]
    fn thumbnail_maps_to_full_cover() {
        assert_eq!(cover_from_thumbnail("/a/covers/3_tn.jpg"), "/a/covers/3.jpg");
    }
}
