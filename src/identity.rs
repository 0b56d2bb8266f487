use uuid::Uuid;

/// Namespace for athlete identifiers. Changing it re-keys every athlete.
pub const ATHLETE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_9a4d_5e3f_8c21_d0a4_b7e9_1f36);

/// Derive the athlete identifier from a name pair.
///
/// Both parts are trimmed and lower-cased, so the same person exported by
/// Catapult and ForceDecks resolves to the same id. Two athletes sharing a
/// full name share an id; there is no tiebreaker.
pub fn resolve(first_name: &str, last_name: &str) -> Uuid {
    let name = format!(
        "{}|{}",
        first_name.trim().to_lowercase(),
        last_name.trim().to_lowercase()
    );
    Uuid::new_v5(&ATHLETE_NAMESPACE, name.as_bytes())
}
