//! One-shot reveal of elements as they scroll into view.

/// Classes that opt an element into the reveal animation.
pub const REVEAL_CLASSES: [&str; 6] = [
    "fade-in",
    "fade-in-up",
    "fade-in-down",
    "fade-in-left",
    "fade-in-right",
    "reveal",
];

/// Classes added once an element is revealed.
pub const REVEALED_CLASSES: [&str; 2] = ["active", "animated"];

/// Share of an element that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// The visible area, shrunk at the bottom so elements reveal slightly after
/// they enter the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f64,
    pub bottom_margin: f64,
}

impl Viewport {
    pub const DEFAULT_BOTTOM_MARGIN: f64 = 50.0;

    pub fn new(height: f64) -> Self {
        Self {
            height,
            bottom_margin: Self::DEFAULT_BOTTOM_MARGIN,
        }
    }

    /// Visibility of an element whose top edge sits at `top` (relative to
    /// the viewport's top) and which is `height` tall.
    pub fn observe(&self, top: f64, height: f64) -> Visibility {
        let visible_bottom = (self.height - self.bottom_margin).max(0.0);
        let overlap = ((top + height).min(visible_bottom) - top.max(0.0)).max(0.0);
        let is_intersecting = top < visible_bottom && top + height > 0.0;

        let ratio = if height > 0.0 {
            (overlap / height).clamp(0.0, 1.0)
        } else if is_intersecting {
            1.0
        } else {
            0.0
        };

        Visibility {
            is_intersecting,
            ratio,
        }
    }
}

/// One observation of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl Visibility {
    pub fn meets(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealElement {
    id: String,
    classes: Vec<String>,
    state: RevealState,
}

impl RevealElement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Tracks every revealable element of a page.
#[derive(Debug, Clone, Default)]
pub struct RevealAnimator {
    elements: Vec<RevealElement>,
}

impl RevealAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element. Elements without a reveal class are
    /// ignored and `false` is returned.
    pub fn register(&mut self, id: impl Into<String>, classes: &[&str]) -> bool {
        if !classes.iter().any(|c| REVEAL_CLASSES.contains(c)) {
            return false;
        }

        self.elements.push(RevealElement {
            id: id.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            state: RevealState::Hidden,
        });
        true
    }

    /// Feed an observation for element `id`. Returns `true` when this
    /// observation revealed it. Revealed elements never go back.
    pub fn observe(&mut self, id: &str, visibility: Visibility) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };

        if element.state == RevealState::Revealed || !visibility.meets(REVEAL_THRESHOLD) {
            return false;
        }

        element.state = RevealState::Revealed;
        for class in REVEALED_CLASSES {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
        true
    }

    pub fn element(&self, id: &str) -> Option<&RevealElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn pending(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.state == RevealState::Hidden)
            .count()
    }
}
