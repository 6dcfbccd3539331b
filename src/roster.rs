//! Turning team-card and person templates into typed records.

use crate::{
    definitions::{PlayerSlot, Roster, TeamCard},
    mediawiki_api::title_key,
    wikitext::{
        Template, extract_templates,
        markup::{link_target, plain_text, strip_templates},
    },
};

/// Template names that describe a team's lineup on a tournament page.
pub const TEAM_CARD_TEMPLATES: [&str; 3] = ["teamcard", "teamcardshort", "teamcardsmall"];
/// Template used for each member on a team page.
pub const PERSON_TEMPLATE: &str = "person";
/// Team cards have at most this many player slots (`p1`..`p8`).
pub const MAX_CARD_SLOTS: usize = 8;

/// Convert one team-card template. `None` when it has no team or no players.
pub fn team_card(template: &Template) -> Option<TeamCard> {
    let team = strip_templates(template.param("team")?).trim().to_string();
    if team.is_empty() {
        return None;
    }

    let players = (1..=MAX_CARD_SLOTS)
        .filter_map(|idx| {
            let name = template.param(&format!("p{}", idx))?;
            let link = template
                .param(&format!("p{}link", idx))
                .map(link_target)
                .unwrap_or_else(|| name.to_string());
            Some(PlayerSlot {
                name: plain_text(name),
                link: link.replace(' ', "_"),
            })
        })
        .collect::<Vec<_>>();

    if players.is_empty() {
        log::debug!("Dropping team card for {:?}: no players", team);
        return None;
    }
    Some(TeamCard { team, players })
}

/// All usable team cards on a tournament page, in page order.
pub fn team_cards(wikitext: &str) -> Vec<TeamCard> {
    extract_templates(wikitext, &TEAM_CARD_TEMPLATES)
        .iter()
        .filter_map(team_card)
        .collect()
}

/// Build the id -> flag roster of a team page from its `person` templates.
///
/// Entries without both an `id` and a `flag` are skipped.
pub fn roster(wikitext: &str) -> Roster {
    let mut roster = Roster::default();
    for person in extract_templates(wikitext, &[PERSON_TEMPLATE]) {
        match (person.get_param("id"), person.get_param("flag")) {
            (Ok(id), Ok(flag)) => roster.insert(title_key(id), flag.to_lowercase()),
            (Err(e), _) | (_, Err(e)) => log::debug!("Skipping person entry: {}", e),
        }
    }
    roster
}
