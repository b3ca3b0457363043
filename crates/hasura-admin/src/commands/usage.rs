use hasura_admin_sdk::config::{ADMIN_SECRET_ENV, ENDPOINT_ENV};

/// Print a compact command reference.
pub fn run() {
    let endpoint_hint = if std::env::var(ENDPOINT_ENV).is_ok() {
        " (set)"
    } else {
        ""
    };
    let secret_hint = if std::env::var(ADMIN_SECRET_ENV).is_ok() {
        " (set)"
    } else {
        ""
    };

    print!(
        r#"hasura-admin: Hasura tables as admin-panel resources

COMMANDS:
  hasura-admin schema fetch [--output FILE]          Introspect the endpoint, write schema JSON
  hasura-admin resources                             List resources from --config
  hasura-admin properties <RESOURCE>                 Property types and flags of a resource
  hasura-admin records list <RESOURCE>               List records (default 10, offset 0)
    [--limit N] [--offset N]
    [--sort-by FIELD] [--direction asc|desc]
    [--filter FIELD=VALUE]...                        Arrays match any; {{"from","to"}} on dates
  hasura-admin records count <RESOURCE>              Count records
    [--filter FIELD=VALUE]...
  hasura-admin records read <RESOURCE> <ID>          One record by primary key
  hasura-admin records read-many <RESOURCE> <ID>...  Several records by primary key
  hasura-admin records create <RESOURCE>             Insert a record
    --set FIELD=VALUE...                             Dotted fields address JSON columns
  hasura-admin records update <RESOURCE> <ID>        Update a record
    --set FIELD=VALUE...
  hasura-admin records delete <RESOURCE> <ID>        Delete a record

GLOBAL OPTIONS:
  --endpoint <URL>        GraphQL endpoint
  --admin-secret <SECRET> Sent as x-hasura-admin-secret
  --role <ROLE>           Sent as x-hasura-role
  --schema <FILE>         Introspection JSON (fetched from the endpoint if omitted)
  --config <FILE>         Resource config (TOML); unlisted tables use primary key "id"
  --format human|json     Force output format (auto-detected by default)

ENVIRONMENT:
  ${ENDPOINT_ENV}{endpoint_hint}
  ${ADMIN_SECRET_ENV}{secret_hint}
"#
    );
}
