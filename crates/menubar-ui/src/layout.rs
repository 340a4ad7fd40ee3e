use menubar_core::{Point, Rect};

use crate::item::MenuItem;
use crate::mnemonic::Mnemonic;

/// Where each label of a bar sits.
///
/// Index `i` always maps to item `i`; keyboard navigation resolves "the
/// label at the focus index" through [`rect`](LabelLayout::rect).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelLayout {
    bounds: Rect,
    labels: Vec<Rect>,
}

impl LabelLayout {
    /// Lay out `items` left to right on one row starting at `origin`, each
    /// label padded by `padding` columns on both sides.
    pub fn compute(items: &[MenuItem], origin: Point, width: i32, padding: i32) -> Self {
        let mut x = origin.x;
        let labels = items
            .iter()
            .map(|item| {
                let w = Mnemonic::parse(&item.label).width() + 2 * padding;
                let r = Rect::from_origin(Point::new(x, origin.y), w, 1);
                x += w;
                r
            })
            .collect();
        Self {
            bounds: Rect::from_origin(origin, width.max(x - origin.x), 1),
            labels,
        }
    }

    /// The whole bar row.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.labels.get(index).copied()
    }

    /// Index of the label under `p`.
    pub fn hit(&self, p: Point) -> Option<usize> {
        self.labels.iter().position(|r| r.contains(p))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
