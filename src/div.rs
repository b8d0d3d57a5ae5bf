/// Integer division that rounds up.
pub fn div_up(p: usize, q: usize) -> usize {
    if p % q == 0 {
        p / q
    } else {
        1 + p / q
    }
}
