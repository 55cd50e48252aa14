use super::{subject, CmdMessage, CmdResult, CommentEntry, Heading};
use crate::error::Result;
use crate::gateway::EntityGateway;
use crate::ids::Alias;
use crate::model::Comment;

pub fn run<G: EntityGateway>(gateway: &G, card: &Alias) -> Result<CmdResult> {
    let mut result = CmdResult::with_heading(Heading::new("Comments for card", subject(card)));
    let Some(mut comments) = gateway.comments(&card.canonical.remote_id)? else {
        return Ok(result.not_found());
    };

    if comments.is_empty() {
        result.add_message(CmdMessage::info("No comments."));
        return Ok(result);
    }

    // Oldest first; undated comments keep their relative order at the front
    comments.sort_by_key(|c| c.date);
    result.comments = comments.into_iter().map(entry).collect();
    Ok(result)
}

fn entry(comment: Comment) -> CommentEntry {
    CommentEntry {
        author: comment.member_creator.full_name,
        username: comment.member_creator.username,
        date: comment.date,
        text: comment.data.text,
    }
}
