//! The [`Grid`] type: a 2D buffer of [`Cell`]s with clipped views.
//!
//! Cloning a `Grid` yields another view of the **same** storage. Views use
//! absolute coordinates; [`slice`](Grid::slice) narrows the clip rectangle
//! so a widget cannot paint outside the region it was handed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geom::{Point, Rect};
use crate::style::{Cell, Style};

#[derive(Debug)]
struct Buffer {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Buffer {
    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height {
            Some((p.y as usize) * self.width + (p.x as usize))
        } else {
            None
        }
    }
}

/// A 2D grid of [`Cell`]s backed by shared storage.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<Buffer>>,
    clip: Rect,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with blank cells.
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            buffer: Rc::new(RefCell::new(Buffer {
                cells: vec![Cell::default(); (w * h) as usize],
                width: w as usize,
                height: h as usize,
            })),
            clip: Rect::new(0, 0, w, h),
        }
    }

    /// The clip rectangle of this view.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.clip
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.clip.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.clip.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.clip.contains(p)
    }

    /// A view sharing this buffer, clipped to `r` ∩ the current bounds.
    pub fn slice(&self, r: Rect) -> Grid {
        Grid {
            buffer: Rc::clone(&self.buffer),
            clip: self.clip.intersect(r),
        }
    }

    /// Read the cell at `p`; blank outside the view.
    pub fn at(&self, p: Point) -> Cell {
        if !self.clip.contains(p) {
            return Cell::default();
        }
        let buf = self.buffer.borrow();
        buf.index(p).map(|i| buf.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. No-op outside the view.
    pub fn set(&self, p: Point, cell: Cell) {
        if !self.clip.contains(p) {
            return;
        }
        let mut buf = self.buffer.borrow_mut();
        if let Some(i) = buf.index(p) {
            buf.cells[i] = cell;
        }
    }

    /// Fill every cell of the view with `cell`.
    pub fn fill(&self, cell: Cell) {
        let mut buf = self.buffer.borrow_mut();
        for p in self.clip.iter() {
            if let Some(i) = buf.index(p) {
                buf.cells[i] = cell;
            }
        }
    }

    /// Write `text` on one row starting at `at`. Returns the number of
    /// columns consumed, including clipped ones.
    pub fn print(&self, at: Point, text: &str, style: Style) -> i32 {
        let mut x = at.x;
        for ch in text.chars() {
            self.set(Point::new(x, at.y), Cell::new(ch, style));
            x += 1;
        }
        x - at.x
    }

    /// Copy every cell of `src` into the same positions of `self`.
    pub fn copy_from(&self, src: &Grid) {
        if Rc::ptr_eq(&self.buffer, &src.buffer) {
            return;
        }
        let area = self.clip.intersect(src.clip);
        let src_buf = src.buffer.borrow();
        let mut dst_buf = self.buffer.borrow_mut();
        for p in area.iter() {
            if let (Some(si), Some(di)) = (src_buf.index(p), dst_buf.index(p)) {
                dst_buf.cells[di] = src_buf.cells[si];
            }
        }
    }

    /// Read one row of the view back as a string.
    pub fn row_text(&self, y: i32) -> String {
        (self.clip.min.x..self.clip.max.x)
            .map(|x| self.at(Point::new(x, y)).ch)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the cells of `curr` that differ from `prev`.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let bounds = curr.bounds();
    let cells = bounds
        .iter()
        .filter_map(|pos| {
            let cell = curr.at(pos);
            (prev.at(pos) != cell).then_some(FrameCell { cell, pos })
        })
        .collect();
    Frame {
        cells,
        width: bounds.width(),
        height: bounds.height(),
    }
}
