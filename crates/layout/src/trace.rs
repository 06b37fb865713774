use shared::domain::CardId;

use crate::resolver::LayoutDescriptor;

/// Observer handed to the resolver instead of a global debug flag.
pub trait LayoutTrace: Send + Sync {
    fn resolved(&self, card: CardId, viewport_width: f64, descriptor: &LayoutDescriptor);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl LayoutTrace for NoopTrace {
    fn resolved(&self, _card: CardId, _viewport_width: f64, _descriptor: &LayoutDescriptor) {}
}

/// Forwards every resolution to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl LayoutTrace for TracingTrace {
    fn resolved(&self, card: CardId, viewport_width: f64, descriptor: &LayoutDescriptor) {
        tracing::debug!(
            %card,
            viewport_width,
            card_width = descriptor.card_width,
            card_height = descriptor.card_height,
            image_height = descriptor.image_height,
            label_variant = ?descriptor.label_variant,
            "resolved card layout"
        );
    }
}
