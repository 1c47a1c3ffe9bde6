use std::fmt::Write;

use crate::app_state::{DirectoryView, MediaCard};
use crate::media::language_label;

pub const EMPTY_RESULTS_MESSAGE: &str = "Aucun média trouvé.";
pub const LOAD_FAILURE_MESSAGE: &str = "Erreur de chargement des données.";
const PREVIOUS_PAGE_LABEL: &str = "« précédent";
const NEXT_PAGE_LABEL: &str = "suivant »";

pub fn render_load_failure() -> String {
    LOAD_FAILURE_MESSAGE.to_string()
}

pub fn render_view(view: &DirectoryView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "({}/{}) page {}/{}",
        view.matches(),
        view.total,
        view.page.page,
        view.page.total_pages
    );

    if view.page.items.is_empty() {
        out.push_str(EMPTY_RESULTS_MESSAGE);
        out.push('\n');
        return out;
    }

    for card in &view.page.items {
        out.push('\n');
        out.push_str(&render_card(card));
    }

    let mut navigation = Vec::new();
    if view.page.has_previous() {
        navigation.push(PREVIOUS_PAGE_LABEL);
    }
    if view.page.has_next() {
        navigation.push(NEXT_PAGE_LABEL);
    }
    if !navigation.is_empty() {
        let _ = writeln!(out, "\n{}", navigation.join(" | "));
    }
    out
}

pub fn render_card(card: &MediaCard<'_>) -> String {
    let record = card.record;
    let star = if card.favorite { '★' } else { '☆' };
    let mut out = String::new();

    let _ = write!(out, "{star} ");
    if !record.country_code.is_empty() {
        let _ = write!(out, "[{}] ", record.country_code.to_uppercase());
    }
    let _ = writeln!(out, "{}", record.name);

    let meta = meta_line(card);
    if !meta.is_empty() {
        let _ = writeln!(out, "  {meta}");
    }

    let link = if record.url.is_empty() { "#" } else { record.url.as_str() };
    let _ = writeln!(out, "  {link}");
    out
}

fn meta_line(card: &MediaCard<'_>) -> String {
    let record = card.record;
    let mut parts: Vec<String> = Vec::new();
    if !record.region.is_empty() {
        parts.push(record.region.clone());
    }
    let description = match (record.category.is_empty(), record.language.is_empty()) {
        (false, false) => format!("{} en {}", record.category, language_label(&record.language)),
        (false, true) => record.category.clone(),
        (true, false) => language_label(&record.language).to_string(),
        (true, true) => String::new(),
    };
    if !description.is_empty() {
        parts.push(description);
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterState;
    use crate::media::MediaRecord;
    use crate::options::FilterOptions;
    use crate::pagination::paginate;
    use pretty_assertions::assert_eq;

    fn card(record: &MediaRecord, favorite: bool) -> MediaCard<'_> {
        MediaCard {
            record,
            id: record.id(),
            favorite,
        }
    }

    #[test]
    fn card_shows_flag_meta_and_link() {
        let record = MediaRecord {
            name: "France Bleu Breizh".into(),
            country_code: "fr".into(),
            region: "Bretagne".into(),
            category: "Radio".into(),
            language: "fr".into(),
            url: "https://bleu.example".into(),
            ..Default::default()
        };
        assert_eq!(
            render_card(&card(&record, true)),
            concat!(
                "★ [FR] France Bleu Breizh\n",
                "  Bretagne · Radio en Français\n",
                "  https://bleu.example\n",
            )
        );
    }

    #[test]
    fn sparse_cards_fall_back_gracefully() {
        let record = MediaRecord {
            name: "Sans lien".into(),
            ..Default::default()
        };
        assert_eq!(render_card(&card(&record, false)), "☆ Sans lien\n  #\n");
    }

    #[test]
    fn empty_view_shows_the_empty_message() {
        let filters = FilterState::default();
        let cards: Vec<MediaCard<'_>> = Vec::new();
        let view = DirectoryView {
            filters: &filters,
            options: FilterOptions::default(),
            page: paginate(&cards, 1, 10),
            total: 12,
        };
        assert_eq!(render_view(&view), "(0/12) page 1/1\nAucun média trouvé.\n");
    }

    #[test]
    fn navigation_follows_the_page_position() {
        let filters = FilterState::default();
        let records: Vec<MediaRecord> = ["Un", "Deux", "Trois"]
            .into_iter()
            .map(|name| MediaRecord {
                name: name.into(),
                ..Default::default()
            })
            .collect();
        let cards: Vec<MediaCard<'_>> = records.iter().map(|r| card(r, false)).collect();
        let view_at = |page| DirectoryView {
            filters: &filters,
            options: FilterOptions::default(),
            page: paginate(&cards, page, 1),
            total: 3,
        };

        assert_eq!(
            render_view(&view_at(1)),
            "(3/3) page 1/3\n\n☆ Un\n  #\n\nsuivant »\n"
        );
        assert!(render_view(&view_at(2)).ends_with("\n« précédent | suivant »\n"));
        assert!(render_view(&view_at(3)).ends_with("☆ Trois\n  #\n\n« précédent\n"));
    }
}
