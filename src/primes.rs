//! Bucket-count helpers.
//!
//! A prime bucket count spreads `hash % buckets` better; it is a
//! recommendation only, tables accept any non-zero size.

/// Prime sizes known to work well, smallest first.
pub const SUGGESTED_PRIMES: &[usize] = &[
    11, 23, 31, 41, 53, 61, 71, 83, 97, //
    101, 211, 307, 401, 503, 601, 701, 809, 907, //
    1009, 2003, 3001, 4001, 5003, 6007, 7001, 8009, 9001, //
    10007, 20011, 30011, 40009, 50021, 60013, 70001, 80021, 90001, //
    100003,
];

/// Trial-division primality test; bucket counts are small enough.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3usize;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest suggested prime `>= wanted`. Past the table, the next prime
/// found by search.
pub fn suggested_bucket_count(wanted: usize) -> usize {
    if let Some(&p) = SUGGESTED_PRIMES.iter().find(|&&p| p >= wanted) {
        return p;
    }
    let mut n = wanted;
    while !is_prime(n) {
        n = n.saturating_add(1);
        if n == usize::MAX {
            break;
        }
    }
    n
}
