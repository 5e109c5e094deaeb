use std::path::PathBuf;

use rd_checklist_lib::catalog::SearchParams;

use crate::CliError;
use crate::cli_types::SearchArgs;

use super::log_card_line;

pub(crate) fn run_search(db: Option<PathBuf>, args: SearchArgs) -> Result<(), CliError> {
    let json = args.json;
    let params = SearchParams {
        q: args.query,
        card_type: args.card_type,
        attribute: args.attribute,
        level: args.level,
        set_id: args.set_id,
        rarity: args.rarity,
        owned: args.owned,
        limit: args.limit,
        offset: args.offset,
    };

    let checklist = crate::open_checklist(db)?;
    let cards = checklist.search(&params)?;

    if json {
        log::info!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        log::info!("No matching cards.");
        return Ok(());
    }
    for card in &cards {
        log_card_line(card);
    }
    crate::log_blank();
    log::info!(
        "{} card(s) shown, starting at {}",
        cards.len(),
        params.offset
    );
    Ok(())
}
