use super::{CmdResult, Heading};
use crate::error::Result;
use crate::gateway::EntityGateway;
use crate::ids::Alias;

/// Describes one entity. A missing entity is reported, not raised.
pub fn run<G: EntityGateway>(gateway: &G, alias: &Alias) -> Result<CmdResult> {
    let canonical = &alias.canonical;
    let result = CmdResult::with_heading(Heading::new(
        format!("Description of {}", canonical.tag.noun()),
        canonical.remote_id.to_string(),
    ));

    match gateway.fetch(canonical.tag, &canonical.remote_id)? {
        Some(entity) => Ok(CmdResult {
            described: Some(entity.summary()),
            ..result
        }),
        None => Ok(result.not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CanonicalId, ShortId, TypeTag};
    use crate::model::Entity;
    use crate::test_utils::{board, list, member, rid, MockGateway};

    fn alias(tag: TypeTag, n: u32) -> Alias {
        Alias {
            short_id: ShortId::FIRST,
            canonical: CanonicalId::new(tag, rid(n)),
        }
    }

    #[test]
    fn test_describes_a_board() {
        let mut roadmap = board(1, "Roadmap");
        roadmap.desc = Some("Q3 plans".to_string());
        let gateway = MockGateway::new().with_entity(Entity::Board(roadmap));

        let result = run(&gateway, &alias(TypeTag::Board, 1)).unwrap();
        let heading = result.heading.unwrap();
        assert_eq!(heading.label, "Description of board");
        assert_eq!(heading.subject, rid(1).to_string());
        let summary = result.described.unwrap();
        assert_eq!(summary.title, "Roadmap");
        assert_eq!(summary.description.as_deref(), Some("Q3 plans"));
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_describes_lists_and_members() {
        let gateway = MockGateway::new()
            .with_entity(Entity::List(list(2, "Doing")))
            .with_entity(Entity::Member(member(3, "Ada Lovelace", "ada")));

        let list = run(&gateway, &alias(TypeTag::List, 2)).unwrap();
        assert_eq!(list.described.unwrap().title, "Doing");

        let member = run(&gateway, &alias(TypeTag::Member, 3)).unwrap();
        let summary = member.described.unwrap();
        assert_eq!(summary.title, "Ada Lovelace");
        assert_eq!(summary.details, vec![("username".to_string(), "ada".to_string())]);
    }

    #[test]
    fn test_missing_entity_is_not_found() {
        let gateway = MockGateway::new().with_entity(Entity::Board(board(1, "Roadmap")));
        // Same remote id, other kind
        let result = run(&gateway, &alias(TypeTag::Card, 1)).unwrap();
        assert!(result.is_not_found());
        assert!(result.described.is_none());
    }
}
