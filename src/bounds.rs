use super::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

impl Bounds {
    pub fn new(min: Cell, max: Cell) -> Self {
        Bounds { min, max }
    }

    pub fn around<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<Bounds> {
        let mut bounds = None;
        for &cell in cells {
            Bounds::absorb(&mut bounds, cell);
        }
        bounds
    }

    /// Grows `bounds` to include `cell`. Returns true if the rectangle changed.
    pub fn absorb(bounds: &mut Option<Bounds>, cell: Cell) -> bool {
        match bounds {
            None => {
                *bounds = Some(Bounds::new(cell, cell));
                true
            }
            Some(rect) => {
                let grown = Bounds::new(
                    Cell::new(rect.min.x.min(cell.x), rect.min.y.min(cell.y)),
                    Cell::new(rect.max.x.max(cell.x), rect.max.y.max(cell.y)),
                );
                let changed = grown != *rect;
                *rect = grown;
                changed
            }
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            Cell::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Cell::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    pub fn extend(&mut self, size: i32) {
        self.min.x -= size;
        self.min.y -= size;
        self.max.x += size;
        self.max.y += size;
    }

    pub fn strictly_contains(&self, cell: Cell) -> bool {
        self.min.x < cell.x && cell.x < self.max.x && self.min.y < cell.y && cell.y < self.max.y
    }

    pub fn interior(&self) -> impl Iterator<Item = Cell> {
        let (min, max) = (self.min, self.max);
        (min.x + 1..max.x).flat_map(move |x| (min.y + 1..max.y).map(move |y| Cell::new(x, y)))
    }
}
