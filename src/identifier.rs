use rand::Rng as _;

/// Returns a 32 characters long identifier made of upper-case hexadecimal digits.
pub fn new_identifier() -> String {
    random_hexadecimal::<16>()
}

/// Returns a 12 characters long identifier, short enough to be part of an invoice number.
pub fn short_identifier() -> String {
    random_hexadecimal::<6>()
}

fn random_hexadecimal<const BYTES: usize>() -> String {
    let mut random_bytes = [0u8; BYTES];
    rand::thread_rng().fill(&mut random_bytes[..]);
    random_bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect()
}
