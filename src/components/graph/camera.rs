//! Pan/zoom camera transform and the tween used by the view-fit helpers.

/// Smallest permitted zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Largest permitted zoom factor.
pub const MAX_SCALE: f64 = 8.0;

/// Affine world→screen transform: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Apply a zoom step anchored at screen point `(sx, sy)`: the world point
	/// under the cursor stays under the cursor. Scale is clamped to
	/// [`MIN_SCALE`]..=[`MAX_SCALE`].
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Transform that maps world point `(wx, wy)` to the center of a
	/// `width`×`height` viewport at zoom `k`.
	pub fn centered_on(wx: f64, wy: f64, k: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - wx * k,
			y: height / 2.0 - wy * k,
			k,
		}
	}
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// Time-based camera animation toward a target transform. Starting a new
/// tween simply replaces the in-flight one; there is no queue.
#[derive(Clone, Debug)]
pub struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	duration: f64,
	elapsed: f64,
}

impl CameraTween {
	pub fn new(from: ViewTransform, to: ViewTransform, duration: f64) -> Self {
		Self {
			from,
			to,
			duration,
			elapsed: 0.0,
		}
	}

	/// Advance by `dt` seconds and return the interpolated transform.
	pub fn tick(&mut self, dt: f64) -> ViewTransform {
		self.elapsed = (self.elapsed + dt).min(self.duration);
		let t = ease_out_cubic(self.elapsed / self.duration);
		ViewTransform {
			x: lerp(self.from.x, self.to.x, t),
			y: lerp(self.from.y, self.to.y, t),
			k: lerp(self.from.k, self.to.k, t),
		}
	}

	pub fn finished(&self) -> bool {
		self.elapsed >= self.duration
	}
}
