//! The four forces composed on every simulation tick.
//!
//! Each force only adds to body velocities; integration happens afterwards in
//! [`super::simulation::Simulation::step`]. All forces operate on the body
//! arena by index.

use std::f64::consts::TAU;

use super::simulation::Body;

/// Magnitude of the nudge used to separate exactly coincident points.
const JIGGLE: f64 = 1e-6;

/// Edge spring with its precomputed degree weighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Spring {
	pub source: usize,
	pub target: usize,
	/// `1 / min(deg(source), deg(target))`: hubs are not yanked around by
	/// each of their many springs.
	pub strength: f64,
	/// Share of the correction applied to the target end.
	pub bias: f64,
}

impl Spring {
	pub fn new(source: usize, target: usize, degrees: &[usize]) -> Self {
		let (ds, dt) = (degrees[source].max(1) as f64, degrees[target].max(1) as f64);
		Self {
			source,
			target,
			strength: 1.0 / ds.min(dt),
			bias: ds / (ds + dt),
		}
	}
}

/// Deterministic separation direction for two coincident points, so the
/// simulation stays reproducible. Always computed from the ordered pair.
fn separation(a: usize, b: usize) -> (f64, f64) {
	let (lo, hi) = (a.min(b) as f64, a.max(b) as f64);
	let angle = (lo * 0.618_034 + hi * 0.414_214 + 0.37) * TAU;
	(angle.cos() * JIGGLE, angle.sin() * JIGGLE)
}

/// Many-body repulsion between every pair of bodies.
///
/// Falls off with the squared distance; distances below `distance_min` are
/// softened so coincident bodies get a bounded push instead of an infinite one.
pub(super) fn repulsion(bodies: &mut [Body], strength: f64, distance_min: f64, alpha: f64) {
	let distance_min_sq = distance_min * distance_min;
	let n = bodies.len();
	for i in 0..n {
		for j in (i + 1)..n {
			let (mut dx, mut dy) = (bodies[j].x - bodies[i].x, bodies[j].y - bodies[i].y);
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = separation(i, j);
			}
			let mut l = dx * dx + dy * dy;
			if l < distance_min_sq {
				l = (distance_min_sq * l).sqrt();
			}
			// Negative weight: each body moves away from the other.
			let w = -strength * alpha / l;
			if !w.is_finite() {
				continue;
			}
			bodies[i].vx += dx * w;
			bodies[i].vy += dy * w;
			bodies[j].vx -= dx * w;
			bodies[j].vy -= dy * w;
		}
	}
}

/// Weak pull of the centroid towards `(cx, cy)`.
pub(super) fn centering(bodies: &mut [Body], cx: f64, cy: f64, strength: f64) {
	if bodies.is_empty() {
		return;
	}
	let n = bodies.len() as f64;
	let (sx, sy) = bodies
		.iter()
		.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
	let (ex, ey) = ((cx - sx / n) * strength, (cy - sy / n) * strength);
	for body in bodies.iter_mut() {
		body.vx += ex;
		body.vy += ey;
	}
}

/// Springs pulling each edge's endpoints towards `distance`.
///
/// Uses the positions the bodies are about to reach (position + velocity) so
/// the correction composes with the forces already applied this tick.
pub(super) fn springs(bodies: &mut [Body], springs: &[Spring], distance: f64, alpha: f64) {
	for spring in springs {
		let (s, t) = (spring.source, spring.target);
		if s == t {
			continue;
		}
		let mut x = bodies[t].x + bodies[t].vx - bodies[s].x - bodies[s].vx;
		let mut y = bodies[t].y + bodies[t].vy - bodies[s].y - bodies[s].vy;
		if x == 0.0 && y == 0.0 {
			(x, y) = separation(s, t);
		}
		let l = (x * x + y * y).sqrt();
		let k = (l - distance) / l * alpha * spring.strength;
		let (x, y) = (x * k, y * k);
		bodies[t].vx -= x * spring.bias;
		bodies[t].vy -= y * spring.bias;
		bodies[s].vx += x * (1.0 - spring.bias);
		bodies[s].vy += y * (1.0 - spring.bias);
	}
}

/// Anti-overlap: pushes apart any two bodies closer than the sum of their
/// radii. Independent of alpha and of the repulsion strength; the lighter
/// (smaller) body takes the larger share of the correction.
pub(super) fn collision(bodies: &mut [Body], radii: &[f64], strength: f64) {
	let n = bodies.len().min(radii.len());
	for i in 0..n {
		for j in (i + 1)..n {
			let r = radii[i] + radii[j];
			let mut x = bodies[i].x + bodies[i].vx - bodies[j].x - bodies[j].vx;
			let mut y = bodies[i].y + bodies[i].vy - bodies[j].y - bodies[j].vy;
			let mut l = x * x + y * y;
			if l >= r * r {
				continue;
			}
			if l == 0.0 {
				(x, y) = separation(i, j);
				l = x * x + y * y;
			}
			let l = l.sqrt();
			let k = (r - l) / l * strength;
			let (ri2, rj2) = (radii[i] * radii[i], radii[j] * radii[j]);
			let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };
			bodies[i].vx += x * k * share;
			bodies[i].vy += y * k * share;
			bodies[j].vx -= x * k * (1.0 - share);
			bodies[j].vy -= y * k * (1.0 - share);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn body(x: f64, y: f64) -> Body {
		Body {
			x,
			y,
			..Body::default()
		}
	}

	#[test]
	fn repulsion_pushes_pair_apart_symmetrically() {
		let mut bodies = vec![body(0.0, 0.0), body(10.0, 0.0)];
		repulsion(&mut bodies, 100.0, 1.0, 1.0);
		assert!(bodies[0].vx < 0.0);
		assert!(bodies[1].vx > 0.0);
		approx::assert_relative_eq!(bodies[0].vx, -bodies[1].vx);
	}

	#[test]
	fn stronger_repulsion_pushes_harder() {
		let mut weak = vec![body(0.0, 0.0), body(10.0, 0.0)];
		let mut strong = weak.clone();
		repulsion(&mut weak, 10.0, 1.0, 1.0);
		repulsion(&mut strong, 300.0, 1.0, 1.0);
		assert!(strong[1].vx > weak[1].vx);
	}

	#[test]
	fn coincident_bodies_get_finite_opposite_pushes() {
		let mut bodies = vec![body(5.0, 5.0), body(5.0, 5.0)];
		repulsion(&mut bodies, 300.0, 1.0, 1.0);
		collision(&mut bodies, &[8.0, 8.0], 0.7);
		for b in &bodies {
			assert!(b.vx.is_finite() && b.vy.is_finite());
		}
		assert!(bodies[0].vx * bodies[1].vx <= 0.0);
		assert!(bodies[0].vx != 0.0 || bodies[0].vy != 0.0);
	}

	#[test]
	fn spring_contracts_long_edge_and_extends_short_one() {
		let degrees = [1, 1];
		let spring = [Spring::new(0, 1, &degrees)];

		let mut long = vec![body(0.0, 0.0), body(200.0, 0.0)];
		springs(&mut long, &spring, 60.0, 1.0);
		assert!(long[0].vx > 0.0 && long[1].vx < 0.0);

		let mut short = vec![body(0.0, 0.0), body(20.0, 0.0)];
		springs(&mut short, &spring, 60.0, 1.0);
		assert!(short[0].vx < 0.0 && short[1].vx > 0.0);
	}

	#[test]
	fn spring_weights_favor_low_degree_end() {
		let spring = Spring::new(0, 1, &[4, 1]);
		approx::assert_relative_eq!(spring.strength, 1.0);
		approx::assert_relative_eq!(spring.bias, 0.8);
	}

	#[test]
	fn collision_ignores_separated_bodies() {
		let mut bodies = vec![body(0.0, 0.0), body(50.0, 0.0)];
		collision(&mut bodies, &[8.0, 8.0], 0.7);
		assert_eq!(bodies[0].vx, 0.0);
		assert_eq!(bodies[1].vx, 0.0);
	}

	#[test]
	fn collision_separates_overlapping_bodies() {
		let mut bodies = vec![body(0.0, 0.0), body(4.0, 0.0)];
		collision(&mut bodies, &[8.0, 8.0], 0.7);
		assert!(bodies[0].vx < 0.0);
		assert!(bodies[1].vx > 0.0);
	}

	#[test]
	fn centering_moves_centroid_towards_target() {
		let mut bodies = vec![body(0.0, 0.0), body(10.0, 0.0)];
		centering(&mut bodies, 105.0, 0.0, 0.1);
		approx::assert_relative_eq!(bodies[0].vx, 10.0);
		approx::assert_relative_eq!(bodies[1].vx, 10.0);
		centering(&mut [], 0.0, 0.0, 0.1);
	}
}
