cases! {
    simple,
    plain_request,
    plain_empty,
    structured_simple,
    structured_all_fields,
    structured_fallback,
    structured_snapshot,
    status,
    status_invalid,
    init_health,
    overflow,
    many,
    handle_close,
    terminate
}
