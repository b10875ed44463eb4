//! Benchmark helper utilities for mascot-rs
//!
//! This module generates synthetic surface definitions shaped like the ones
//! shipped with real shells: a handful of body surfaces, each stacking part
//! surfaces through elements, plus blink, talk and costume animations.

use std::fmt::Write;

/// First ID of the generated part surfaces
pub const PART_BASE_ID: u32 = 1000;

/// Generates surface definition text with `surfaces` body surfaces.
///
/// Every body surface references `parts` part surfaces through elements and
/// carries one blink, one talk and one bind animation.
pub fn generate_surfaces_text(surfaces: u32, parts: u32) -> String {
	let mut text = String::from("descript\n{\nversion,1\n}\n\n");

	for id in 0..surfaces {
		let _ = writeln!(text, "surface{id}\n{{");
		let _ = writeln!(text, "element0,base,body{id}.png,0,0");
		for part in 0..parts {
			let _ = writeln!(text, "element{},overlay,{},{},{}", part + 1, PART_BASE_ID + part, part * 2, part * 3);
		}
		let _ = writeln!(text, "collision0,10,10,90,60,Head");

		let _ = writeln!(text, "animation1.interval,periodic,5");
		for frame in 0..3 {
			let _ = writeln!(text, "animation1.pattern{frame},overlay,{},50,0,0", PART_BASE_ID + frame);
		}
		let _ = writeln!(text, "animation2.interval,talk,3");
		let _ = writeln!(text, "animation2.pattern0,overlay,-1,50,0,0");
		let _ = writeln!(text, "animation2.pattern1,overlay,{},50,4,4", PART_BASE_ID + 1);
		let _ = writeln!(text, "animation3.interval,bind");
		let _ = writeln!(text, "animation3.pattern0,overlay,{},0,0,0", PART_BASE_ID + 2);
		text.push_str("}\n\n");
	}

	for part in 0..parts {
		let _ = writeln!(text, "surface{}\n{{\nelement0,overlay,part{part}.png,0,0\n}}\n", PART_BASE_ID + part);
	}

	text
}

/// Generates definition text where every surface references the next one,
/// ending in a reference back to the first.
pub fn generate_cyclic_surfaces_text(length: u32) -> String {
	let mut text = String::new();
	for id in 0..length {
		let next = (id + 1) % length;
		let _ = writeln!(text, "surface{id}\n{{\nelement0,overlay,layer{id}.png,0,0\nelement1,overlay,{next},1,1\n}}");
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generated_text_shape() {
		let text = generate_surfaces_text(2, 3);
		assert!(text.contains("surface1\n{"));
		assert!(text.contains("element3,overlay,1002,4,6"));
		assert!(text.contains("surface1002\n{"));
	}

	#[test]
	fn test_cyclic_text_wraps() {
		let text = generate_cyclic_surfaces_text(3);
		assert!(text.contains("element1,overlay,0,1,1"));
	}
}
