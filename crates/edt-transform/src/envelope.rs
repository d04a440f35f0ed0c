//! Lower envelope of parabolas: the exact 1-D distance transform.
//!
//! For a 1-D cost sequence `f[0..n]` with sample spacing `s`, the
//! transform computes
//!
//! ```text
//! g[q] = min over p of ( f[p] + ((q - p) * s)^2 )
//! ```
//!
//! Each cost sample contributes the parabola `y = f[p] + (x - p*s)^2`.
//! The envelope maintains the parabolas that win somewhere, each with
//! the abscissa from which it dominates. Parabolas are pushed with
//! strictly increasing apexes; a push pops every incumbent whose
//! dominance region the newcomer swallows, so each parabola is pushed
//! and popped at most once and a whole line costs O(n).
//!
//! The result is the exact minimum, not an approximation: every
//! surviving candidate is enumerated during the sweep.
//!
//! Each parabola carries a label slot `L`, sampled alongside the values
//! to produce Voronoi and feature maps. Plain distance lines
//! instantiate `L = ()`.

/// A parabola `y = height + (x - apex*spacing)^2`.
#[derive(Debug, Clone, Copy)]
struct Parabola<L> {
    apex: usize,
    height: f64,
    label: L,
}

/// A parabola plus the abscissa that is the left border of the open
/// interval where it is below all others in the envelope.
#[derive(Debug, Clone, Copy)]
struct ParabolaRegion<L> {
    parabola: Parabola<L>,
    dominant_from: f64,
}

/// The lower envelope of a set of parabolas with common spacing.
///
/// Reusable across lines: [`LowerEnvelope::clear`] resets the region
/// stack without releasing its allocation.
#[derive(Debug)]
pub struct LowerEnvelope<L = ()> {
    spacing: f64,
    regions: Vec<ParabolaRegion<L>>,
}

impl<L: Copy> LowerEnvelope<L> {
    /// Create an envelope for lines of up to `capacity` samples.
    pub fn new(capacity: usize, spacing: f64) -> Self {
        debug_assert!(spacing > 0.0);
        Self {
            spacing,
            regions: Vec::with_capacity(capacity),
        }
    }

    /// Drop all parabolas and set the spacing for the next line.
    pub fn clear(&mut self, spacing: f64) {
        debug_assert!(spacing > 0.0);
        self.spacing = spacing;
        self.regions.clear();
    }

    /// Number of parabolas currently on the envelope.
    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when no parabola has been pushed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Add the parabola with apex `(apex * spacing, height)`.
    ///
    /// Apexes must arrive in strictly increasing order.
    pub fn push(&mut self, apex: usize, height: f64, label: L) {
        let newcomer = Parabola {
            apex,
            height,
            label,
        };

        let dominant_from = loop {
            match self.regions.last() {
                None => break f64::NEG_INFINITY,
                Some(top) => {
                    debug_assert!(top.parabola.apex < apex);
                    let crossing = self.intersection(&top.parabola, &newcomer);
                    if crossing <= top.dominant_from {
                        // The incumbent never wins anywhere anymore.
                        self.regions.pop();
                    } else {
                        break crossing;
                    }
                }
            }
        };

        self.regions.push(ParabolaRegion {
            parabola: newcomer,
            dominant_from,
        });
    }

    /// Abscissa where `q` starts to win against `p`. Requires
    /// `p.apex < q.apex`; both parabolas have identical curvature, so
    /// the crossing is unique.
    fn intersection(&self, p: &Parabola<L>, q: &Parabola<L>) -> f64 {
        let xp = p.apex as f64 * self.spacing;
        let xq = q.apex as f64 * self.spacing;
        ((q.height + xq * xq) - (p.height + xp * xp)) / (2.0 * (xq - xp))
    }

    #[inline]
    fn value_at(&self, region: &ParabolaRegion<L>, x: f64) -> f64 {
        let dx = x - region.parabola.apex as f64 * self.spacing;
        region.parabola.height + dx * dx
    }

    /// Sample the envelope at positions `0, s, 2s, ...` for every slot
    /// of `values`, writing the winning parabola's value.
    ///
    /// The heights were copied on push, so `values` may alias the
    /// buffer the costs were read from.
    pub fn sample_into(&self, values: &mut [f64]) {
        debug_assert!(!self.regions.is_empty());
        let mut region = 0;
        for (q, out) in values.iter_mut().enumerate() {
            let x = q as f64 * self.spacing;
            while region + 1 < self.regions.len() && self.regions[region + 1].dominant_from < x {
                region += 1;
            }
            *out = self.value_at(&self.regions[region], x);
        }
    }

    /// Sample values and the winning parabola's label together.
    pub fn sample_with_labels_into(&self, values: &mut [f64], labels: &mut [L]) {
        debug_assert!(!self.regions.is_empty());
        debug_assert_eq!(values.len(), labels.len());
        let mut region = 0;
        for (q, (out, label)) in values.iter_mut().zip(labels.iter_mut()).enumerate() {
            let x = q as f64 * self.spacing;
            while region + 1 < self.regions.len() && self.regions[region + 1].dominant_from < x {
                region += 1;
            }
            let winner = &self.regions[region];
            *out = self.value_at(winner, x);
            *label = winner.parabola.label;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_line(costs: &[f64], spacing: f64) -> Vec<f64> {
        let mut env: LowerEnvelope = LowerEnvelope::new(costs.len(), spacing);
        for (i, &f) in costs.iter().enumerate() {
            env.push(i, f, ());
        }
        let mut out = vec![0.0; costs.len()];
        env.sample_into(&mut out);
        out
    }

    fn brute_force_line(costs: &[f64], spacing: f64) -> Vec<f64> {
        (0..costs.len())
            .map(|q| {
                costs
                    .iter()
                    .enumerate()
                    .map(|(p, &f)| {
                        let d = (q as f64 - p as f64) * spacing;
                        f + d * d
                    })
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }

    #[test]
    fn test_foreground_at_both_ends() {
        let big = 1.0e6;
        let out = transform_line(&[0.0, big, big, big, 0.0], 1.0);
        assert_eq!(out, vec![0.0, 1.0, 4.0, 1.0, 0.0]);
    }

    #[test]
    fn test_single_sample_line_is_identity() {
        let out = transform_line(&[7.5], 1.0);
        assert_eq!(out, vec![7.5]);
    }

    #[test]
    fn test_all_sentinel_line_reproduces_sentinel() {
        let sentinel = 4.0e4;
        let out = transform_line(&[sentinel; 6], 1.0);
        // Equal-height parabolas each win at their own apex exactly.
        assert_eq!(out, vec![sentinel; 6]);
    }

    #[test]
    fn test_spacing_scales_squared_steps() {
        let big = 1.0e6;
        let out = transform_line(&[0.0, big, big], 2.0);
        assert_eq!(out, vec![0.0, 4.0, 16.0]);
    }

    #[test]
    fn test_matches_brute_force_on_mixed_costs() {
        let costs = [3.0, 40.0, 0.25, 9.0, 100.0, 1.0, 55.5, 0.0];
        for &spacing in &[1.0, 0.5, 3.0] {
            let fast = transform_line(&costs, spacing);
            let slow = brute_force_line(&costs, spacing);
            for (a, b) in fast.iter().zip(&slow) {
                assert!((a - b).abs() < 1e-9, "{a} vs {b} at spacing {spacing}");
            }
        }
    }

    #[test]
    fn test_each_parabola_pushed_once() {
        // A descending staircase dominates everything before it, so the
        // stack repeatedly pops down to one region.
        let mut env: LowerEnvelope = LowerEnvelope::new(4, 1.0);
        for (i, &f) in [100.0, 50.0, 10.0, 0.0].iter().enumerate() {
            env.push(i, f, ());
        }
        assert!(env.len() <= 4);
        let mut out = vec![0.0; 4];
        env.sample_into(&mut out);
        let slow = brute_force_line(&[100.0, 50.0, 10.0, 0.0], 1.0);
        for (a, b) in out.iter().zip(&slow) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_labels_follow_winning_parabola() {
        let big = 1.0e6;
        let costs = [0.0, big, big, big, 0.0];
        let mut env: LowerEnvelope<u32> = LowerEnvelope::new(costs.len(), 1.0);
        for (i, &f) in costs.iter().enumerate() {
            env.push(i, f, i as u32 + 1);
        }
        let mut values = vec![0.0; costs.len()];
        let mut labels = vec![0u32; costs.len()];
        env.sample_with_labels_into(&mut values, &mut labels);
        // Left half belongs to apex 0, right half to apex 4.
        assert_eq!(labels[0], 1);
        assert_eq!(labels[1], 1);
        assert_eq!(labels[3], 5);
        assert_eq!(labels[4], 5);
    }

    #[test]
    fn test_clear_reuses_allocation() {
        let mut env: LowerEnvelope = LowerEnvelope::new(3, 1.0);
        env.push(0, 5.0, ());
        env.push(1, 5.0, ());
        env.clear(2.0);
        assert!(env.is_empty());
        env.push(0, 0.0, ());
        let mut out = vec![0.0; 2];
        env.sample_into(&mut out);
        assert_eq!(out, vec![0.0, 4.0]);
    }
}
