/// Iterates over integer grid offsets `(i, j)` ring by ring, from the center outwards.
///
/// Ring `k` consists of all offsets with `max(|i|, |j|) == k`, so every offset is visited exactly once.
/// Within a ring, `i` ascends in the outer loop and `j` ascends in the inner loop.
/// Ring 0 is the single offset `(0, 0)`.
#[derive(Debug, Clone)]
pub struct SquareRingIterator {
    n_rings: i32,
    ring: i32,
    i: i32,
    j: i32,
}

impl SquareRingIterator {
    pub fn new(n_rings: usize) -> Self {
        Self {
            n_rings: i32::try_from(n_rings).unwrap_or(i32::MAX),
            ring: 0,
            i: 0,
            j: 0,
        }
    }
}

impl Iterator for SquareRingIterator {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.ring >= self.n_rings {
                return None;
            }
            let k = self.ring;
            if self.i > k {
                //ring exhausted, move to the top-left corner of the next one
                self.ring += 1;
                self.i = -self.ring;
                self.j = -self.ring;
                continue;
            }

            let offset = (self.i, self.j);

            let interior_row = self.i.abs() < k;
            if self.j < k {
                //rows crossing the interior only touch the ring at both ends
                self.j = if interior_row { k } else { self.j + 1 };
            } else {
                self.i += 1;
                self.j = -k;
            }

            return Some(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn first_two_rings_in_sweep_order() {
        let offsets = SquareRingIterator::new(2).collect_vec();
        assert_eq!(
            offsets,
            vec![
                (0, 0),
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ]
        );
    }

    #[test]
    fn rings_cover_the_square_exactly_once() {
        let n_rings = 6;
        let offsets = SquareRingIterator::new(n_rings).collect_vec();
        let k_max = n_rings as i32 - 1;
        assert_eq!(offsets.len(), (2 * k_max as usize + 1).pow(2));
        assert!(offsets.iter().all_unique());
        assert!(
            offsets
                .iter()
                .all(|(i, j)| i.abs() <= k_max && j.abs() <= k_max)
        );
    }

    #[test]
    fn rings_are_visited_in_ascending_order() {
        let rings = SquareRingIterator::new(5)
            .map(|(i, j)| i32::max(i.abs(), j.abs()))
            .collect_vec();
        assert!(rings.windows(2).all(|w| w[0] <= w[1]));
        for k in 1..5 {
            assert_eq!(rings.iter().filter(|&&r| r == k).count(), 8 * k as usize);
        }
    }

    #[test]
    fn no_rings_yields_nothing() {
        assert_eq!(SquareRingIterator::new(0).next(), None);
    }

    #[test]
    fn ring_counts_beyond_i32_still_start_at_the_center() {
        let n_rings = i32::MAX as usize + 2;
        let offsets = SquareRingIterator::new(n_rings).take(2).collect_vec();
        assert_eq!(offsets, vec![(0, 0), (-1, -1)]);
        assert_eq!(SquareRingIterator::new(usize::MAX).next(), Some((0, 0)));
    }
}
