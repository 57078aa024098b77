//! Pure transformation from a flat, approved comment list into a threaded
//! tree, with recursive descendant counts for `most_replies` ordering.

use std::collections::HashMap;

use crate::models::{Comment, CommentNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    MostReplies,
    Newest,
    Oldest,
}

pub fn comment_tree(comments: Vec<Comment>, sort_order: SortOrder) -> Vec<CommentNode> {
    let mut children: HashMap<Option<i32>, Vec<Comment>> = HashMap::new();
    for comment in comments {
        children.entry(comment.parent_comment_id).or_default().push(comment);
    }

    let mut roots = build_level(None, &mut children);
    sort_nodes(&mut roots, sort_order);
    roots
}

fn build_level(parent_id: Option<i32>, children: &mut HashMap<Option<i32>, Vec<Comment>>) -> Vec<CommentNode> {
    let Some(level) = children.remove(&parent_id) else {
        return Vec::new();
    };
    level
        .into_iter()
        .map(|comment| {
            let replies = build_level(Some(comment.id), children);
            let descendant_count = replies.iter().map(|r| 1 + r.descendant_count).sum();
            CommentNode { comment, descendant_count, replies }
        })
        .collect()
}

fn sort_nodes(nodes: &mut [CommentNode], sort_order: SortOrder) {
    match sort_order {
        SortOrder::MostReplies => {
            nodes.sort_by(|a, b| {
                b.descendant_count
                    .cmp(&a.descendant_count)
                    .then_with(|| b.comment.created_at.cmp(&a.comment.created_at))
            });
        }
        SortOrder::Newest => nodes.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at)),
        SortOrder::Oldest => nodes.sort_by(|a, b| a.comment.created_at.cmp(&b.comment.created_at)),
    }
    for node in nodes.iter_mut() {
        sort_nodes(&mut node.replies, sort_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentStatus;
    use chrono::{Duration, Utc};

    fn comment(id: i32, parent: Option<i32>, minutes_ago: i64) -> Comment {
        Comment {
            id,
            document_id: 1,
            parent_comment_id: parent,
            comment_text: format!("comment {id}"),
            session_hash: "session".into(),
            status: CommentStatus::Approved,
            flag_count: 0,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            updated_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn builds_nested_replies() {
        let comments = vec![comment(1, None, 10), comment(2, Some(1), 5), comment(3, Some(2), 1)];
        let tree = comment_tree(comments, SortOrder::Oldest);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].descendant_count, 2);
        assert_eq!(tree[0].replies[0].replies[0].comment.id, 3);
    }

    #[test]
    fn most_replies_ranks_by_descendant_count() {
        let comments = vec![
            comment(1, None, 20),
            comment(2, None, 10),
            comment(3, Some(2), 5),
        ];
        let tree = comment_tree(comments, SortOrder::MostReplies);
        assert_eq!(tree[0].comment.id, 2);
    }
}
