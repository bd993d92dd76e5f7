/// Turn the switch's raw reply into text.
///
/// Non-ASCII bytes are dropped rather than failing the transaction,
/// surrounding whitespace (including CR/LF) is trimmed.
pub fn decode_response(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| char::from(b))
        .collect();
    text.trim().to_string()
}
