use serde::{Deserialize, Serialize};
use shared::domain::{CardId, LabelVariant};

use crate::{
    config::LayoutConfig,
    trace::{LayoutTrace, NoopTrace},
};

/// Pixel metrics for one card at one viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub card: CardId,
    pub card_width: u32,
    pub card_height: u32,
    pub image_height: u32,
    pub header_height: u32,
    pub bottom_area_height: u32,
    pub label_variant: LabelVariant,
}

impl LayoutDescriptor {
    pub fn label<'a>(&self, config: &'a LayoutConfig) -> &'a str {
        config
            .cards
            .get(self.card)
            .labels
            .for_variant(self.label_variant)
    }
}

pub fn resolve_layout(config: &LayoutConfig, viewport_width: f64, card: CardId) -> LayoutDescriptor {
    resolve_layout_traced(config, viewport_width, card, &NoopTrace)
}

pub fn resolve_layout_traced(
    config: &LayoutConfig,
    viewport_width: f64,
    card: CardId,
    trace: &dyn LayoutTrace,
) -> LayoutDescriptor {
    let layout = config.cards.get(card);

    let card_width = pixels(layout.card_width.value_at(viewport_width));
    let image_height = pixels(layout.image_height.value_at(viewport_width));
    let header_height = pixels(layout.header_height);
    let bottom_area_height = pixels(layout.bottom_area_height);
    let card_height = header_height
        .saturating_add(image_height)
        .saturating_add(bottom_area_height);

    // Step function, not interpolated: NaN widths compare false and keep
    // the full label.
    let label_variant = if viewport_width <= config.label_threshold {
        LabelVariant::Abridged
    } else {
        LabelVariant::Full
    };

    let descriptor = LayoutDescriptor {
        card,
        card_width,
        card_height,
        image_height,
        header_height,
        bottom_area_height,
        label_variant,
    };
    trace.resolved(card, viewport_width, &descriptor);
    descriptor
}

/// Resolves every card for one resize event, in `CardId::ALL` order.
pub fn resolve_all(config: &LayoutConfig, viewport_width: f64) -> Vec<LayoutDescriptor> {
    CardId::ALL
        .into_iter()
        .map(|card| resolve_layout(config, viewport_width, card))
        .collect()
}

fn pixels(value: f64) -> u32 {
    if value.is_finite() {
        value.floor().clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
