use crate::core::catalog::ServiceCatalog;
use crate::domain::model::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub service_id: String,
    /// Raw `data-category` attribute.
    pub category: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub filter: String,
    pub active: bool,
}

/// Shows the service cards of one category at a time.
#[derive(Debug, Clone)]
pub struct ServiceFilter {
    buttons: Vec<FilterButton>,
    cards: Vec<ServiceCard>,
}

impl ServiceFilter {
    pub fn new(filters: &[&str], cards: Vec<ServiceCard>) -> Self {
        let buttons = filters
            .iter()
            .map(|filter| FilterButton {
                filter: filter.to_string(),
                active: false,
            })
            .collect();
        let mut filter = Self { buttons, cards };
        filter.apply(Category::default().as_str());
        filter
    }

    pub fn from_catalog(catalog: &ServiceCatalog) -> Self {
        let cards = catalog
            .iter()
            .map(|service| ServiceCard {
                service_id: service.id.clone(),
                category: service.category.to_string(),
                visible: true,
            })
            .collect();
        Self::new(
            &[Category::Caballeros.as_str(), Category::Damas.as_str()],
            cards,
        )
    }

    /// Activate `filter`: its button lights up and only matching cards stay
    /// visible. An empty filter is ignored. Returns the visible card count.
    pub fn apply(&mut self, filter: &str) -> usize {
        if filter.is_empty() {
            return self.visible().count();
        }

        for button in &mut self.buttons {
            button.active = button.filter == filter;
        }
        for card in &mut self.cards {
            card.visible = card.category == filter;
        }

        let shown = self.visible().count();
        tracing::debug!("Filter '{}' shows {} services", filter, shown);
        shown
    }

    pub fn active(&self) -> Option<&str> {
        self.buttons
            .iter()
            .find(|b| b.active)
            .map(|b| b.filter.as_str())
    }

    pub fn buttons(&self) -> &[FilterButton] {
        &self.buttons
    }

    pub fn cards(&self) -> &[ServiceCard] {
        &self.cards
    }

    pub fn visible(&self) -> impl Iterator<Item = &ServiceCard> {
        self.cards.iter().filter(|c| c.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, category: &str) -> ServiceCard {
        ServiceCard {
            service_id: id.to_string(),
            category: category.to_string(),
            visible: true,
        }
    }

    #[test]
    fn test_default_filter_is_caballeros() {
        let filter = ServiceFilter::new(
            &["caballeros", "damas"],
            vec![card("corte", "caballeros"), card("cejas", "damas")],
        );
        assert_eq!(filter.active(), Some("caballeros"));
        let visible: Vec<_> = filter.visible().map(|c| c.service_id.as_str()).collect();
        assert_eq!(visible, vec!["corte"]);
    }

    #[test]
    fn test_filter_shows_matching_hides_rest() {
        let mut filter = ServiceFilter::new(
            &["caballeros", "damas"],
            vec![
                card("corte", "caballeros"),
                card("cejas", "damas"),
                card("tinte", "damas"),
                card("sin-categoria", ""),
            ],
        );

        assert_eq!(filter.apply("damas"), 2);
        for c in filter.cards() {
            assert_eq!(c.visible, c.category == "damas", "{}", c.service_id);
        }
        assert_eq!(filter.active(), Some("damas"));
        assert!(!filter.buttons()[0].active);
    }

    #[test]
    fn test_empty_filter_ignored() {
        let mut filter = ServiceFilter::new(&["caballeros"], vec![card("corte", "caballeros")]);
        assert_eq!(filter.apply(""), 1);
        assert_eq!(filter.active(), Some("caballeros"));
    }

    #[test]
    fn test_catalog_filter_covers_every_service() {
        let catalog = ServiceCatalog::embedded().unwrap();
        let mut filter = ServiceFilter::from_catalog(&catalog);
        let caballeros = filter.visible().count();
        let damas = filter.apply("damas");
        assert_eq!(caballeros + damas, catalog.len());
    }
}
