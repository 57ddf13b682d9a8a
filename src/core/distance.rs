//! Distance functions for the two item kinds

/// Number of distinct byte values tracked by the last-occurrence table.
const ALPHABET: usize = 256;

/// Damerau-Levenshtein distance between two byte sequences.
///
/// Insertions, deletions, substitutions and transpositions of adjacent bytes
/// each cost 1. This is the unrestricted variant: a substring may be edited
/// after a transposition, so `edit_distance(b"ca", b"abc") == 2`.
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
	let (m, n) = (a.len(), b.len());
	if m == 0 || n == 0 {
		return m.max(n);
	}

	// (m + 2) x (n + 2) table; row 0 and column 0 hold the sentinel.
	let width = n + 2;
	let sentinel = m + n;
	let at = |i: usize, j: usize| i * width + j;
	let mut d = vec![0usize; (m + 2) * width];

	d[at(0, 0)] = sentinel;
	for i in 0..=m {
		d[at(i + 1, 0)] = sentinel;
		d[at(i + 1, 1)] = i;
	}
	for j in 0..=n {
		d[at(0, j + 1)] = sentinel;
		d[at(1, j + 1)] = j;
	}

	// Last row in which each byte value was seen in `a`.
	let mut last_row = [0usize; ALPHABET];

	for i in 1..=m {
		// Last column in this row where a[i - 1] matched.
		let mut last_match = 0;
		for j in 1..=n {
			let k = last_row[b[j - 1] as usize];
			let l = last_match;
			let cost = if a[i - 1] == b[j - 1] {
				last_match = j;
				0
			} else {
				1
			};

			let substitution = d[at(i, j)] + cost;
			let insertion = d[at(i + 1, j)] + 1;
			let deletion = d[at(i, j + 1)] + 1;
			let transposition = d[at(k, l)] + (i - k - 1) + 1 + (j - l - 1);

			d[at(i + 1, j + 1)] = substitution.min(insertion).min(deletion).min(transposition);
		}
		last_row[a[i - 1] as usize] = i;
	}

	d[at(m + 1, n + 1)]
}

/// Hamming distance between two 64-bit fingerprints.
#[inline]
pub fn hash_distance(a: u64, b: u64) -> usize {
	(a ^ b).count_ones() as usize
}
