use std::fmt;

use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::domain::publication::is_not_blank;

/// Identifies a comment within its publication only. Ids are never reused:
/// a new comment gets the highest id present or ever assigned, plus one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl From<u64> for CommentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[nutype(
    validate(predicate = is_not_blank),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct UserName(String);

#[nutype(
    validate(predicate = is_not_blank),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct CommentContent(String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub user: UserName,
    pub content: CommentContent,
    pub comment_date: DateTime<Utc>,
    /// Set by content edits only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: u64,
}

impl Comment {
    /// Likes never go below zero
    pub fn set_like(&mut self, increment: bool) {
        self.likes = if increment {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
    }
}

/// Comments embedded in a publication, in display order.
/// Every mutation rewrites the whole sequence in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(Vec<Comment>);

impl Comments {
    pub fn as_slice(&self) -> &[Comment] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Comment> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.0.iter().find(|comment| comment.id == id)
    }

    fn get_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.0.iter_mut().find(|comment| comment.id == id)
    }

    /// `max(existing ids) + 1`, or 1 for an empty sequence. `last_assigned` is the
    /// highest id ever handed out in this publication, so removing the newest comment
    /// does not make its id available again. `None` once ids are exhausted.
    pub fn next_id(&self, last_assigned: CommentId) -> Option<CommentId> {
        let max = self
            .0
            .iter()
            .map(|comment| comment.id)
            .max()
            .unwrap_or_default();
        max.max(last_assigned).0.checked_add(1).map(CommentId)
    }

    /// Appends a new comment at the end and returns it, `None` if no id is left
    pub fn add(
        &mut self,
        last_assigned: CommentId,
        user: UserName,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Option<Comment> {
        let comment = Comment {
            id: self.next_id(last_assigned)?,
            user,
            content,
            comment_date: now,
            modified_date: None,
            likes: 0,
        };
        self.0.push(comment.clone());
        Some(comment)
    }

    /// Replaces the content of a comment, `None` if the id is absent
    pub fn edit(
        &mut self,
        id: CommentId,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Option<Comment> {
        let comment = self.get_mut(id)?;
        comment.content = content;
        comment.modified_date = Some(now);
        Some(comment.clone())
    }

    /// Removes a comment, `false` if the id is absent
    pub fn remove(&mut self, id: CommentId) -> bool {
        let before = self.0.len();
        self.0.retain(|comment| comment.id != id);
        self.0.len() != before
    }

    /// Adds or withdraws one like, `false` if the id is absent
    pub fn set_like(&mut self, id: CommentId, increment: bool) -> bool {
        match self.get_mut(id) {
            Some(comment) => {
                comment.set_like(increment);
                true
            }
            None => false,
        }
    }
}

impl From<Vec<Comment>> for Comments {
    fn from(value: Vec<Comment>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    fn user(name: &str) -> UserName {
        UserName::try_new(name).unwrap()
    }

    fn text(content: &str) -> CommentContent {
        CommentContent::try_new(content).unwrap()
    }

    fn ids(comments: &Comments) -> Vec<u64> {
        comments.as_slice().iter().map(|c| c.id.0).collect()
    }

    // adds a comment the way a publication does, tracking the last assigned id
    fn push(comments: &mut Comments, last: &mut CommentId, content: &str) -> Comment {
        let comment = comments
            .add(*last, user("ana"), text(content), now())
            .unwrap();
        *last = comment.id;
        comment
    }

    #[test]
    fn test_first_comment_gets_id_one() {
        let mut comments = Comments::default();
        let comment = comments
            .add(CommentId::default(), user("ana"), text("hi"), now())
            .unwrap();

        assert_eq!(comment.id, CommentId(1));
        assert_eq!(comment.likes, 0);
        assert_eq!(comment.comment_date, now());
        assert!(comment.modified_date.is_none());
    }

    #[test]
    fn test_ids_increase_and_keep_insertion_order() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");
        push(&mut comments, &mut last, "two");
        push(&mut comments, &mut last, "three");

        assert_eq!(ids(&comments), vec![1, 2, 3]);
    }

    #[test]
    fn test_next_id_follows_max_not_length() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");
        push(&mut comments, &mut last, "two");
        push(&mut comments, &mut last, "three");

        assert!(comments.remove(CommentId(1)));
        let comment = push(&mut comments, &mut last, "four");

        assert_eq!(comment.id, CommentId(4));
        assert_eq!(ids(&comments), vec![2, 3, 4]);
    }

    #[test]
    fn test_removed_newest_id_is_not_reused() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");

        assert!(comments.remove(CommentId(1)));
        let comment = push(&mut comments, &mut last, "two");

        assert_eq!(comment.id, CommentId(2));
    }

    #[test]
    fn test_next_id_without_history_uses_existing_ids() {
        // documents written before the last assigned id was tracked
        let comments = Comments::from(vec![Comment {
            id: CommentId(5),
            user: user("ana"),
            content: text("old"),
            comment_date: now(),
            modified_date: None,
            likes: 2,
        }]);

        assert_eq!(comments.next_id(CommentId::default()), Some(CommentId(6)));
    }

    #[test]
    fn test_exhausted_ids_add_nothing() {
        let mut comments = Comments::default();

        assert_eq!(comments.next_id(CommentId(u64::MAX)), None);
        assert!(
            comments
                .add(CommentId(u64::MAX), user("ana"), text("late"), now())
                .is_none()
        );
        assert!(comments.is_empty());
    }

    #[test]
    fn test_remove_missing_comment_leaves_sequence_unchanged() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");

        assert!(!comments.remove(CommentId(7)));
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn test_edit_sets_modified_date_and_keeps_comment_date() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");

        let later = now() + Duration::minutes(5);
        let edited = comments.edit(CommentId(1), text("uno"), later).unwrap();

        assert_eq!(edited.content.as_ref(), "uno");
        assert_eq!(edited.comment_date, now());
        assert_eq!(edited.modified_date, Some(later));
        assert_eq!(comments.get(CommentId(1)), Some(&edited));
    }

    #[test]
    fn test_edit_missing_comment() {
        let mut comments = Comments::default();
        assert!(comments.edit(CommentId(1), text("uno"), now()).is_none());
    }

    #[test]
    fn test_likes_never_go_negative() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");

        assert!(comments.set_like(CommentId(1), false));
        assert_eq!(comments.get(CommentId(1)).unwrap().likes, 0);

        comments.set_like(CommentId(1), true);
        comments.set_like(CommentId(1), true);
        comments.set_like(CommentId(1), false);
        assert_eq!(comments.get(CommentId(1)).unwrap().likes, 1);

        assert!(!comments.set_like(CommentId(9), true));
    }

    #[test]
    fn test_stored_comment_layout() {
        let mut comments = Comments::default();
        let mut last = CommentId::default();
        push(&mut comments, &mut last, "one");

        let value = serde_json::to_value(&comments).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": 1,
                "user": "ana",
                "content": "one",
                "commentDate": "2025-03-01T10:00:00Z",
                "likes": 0
            }])
        );
    }
}
