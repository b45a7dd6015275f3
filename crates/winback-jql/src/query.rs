//! The two JQL script payloads.
//!
//! Both scan the full event history (2020-01-01 through the run date) and
//! share the same eligibility filter: `Purchase` events in the Food, Shop, or
//! Health section of the Hubtel app, excluding test stations/zones. They
//! differ on guests: the first-purchase scan drops guests heuristically
//! (explicit flag, missing phone, or a `"guest"` placeholder), while the
//! purchase-log scan accepts only records with the explicit
//! `IsGuest === false` flag.
//!
//! Output field names match the serde field names of the record types in
//! `winback-core`.

/// Per customer, the calendar date of the earliest qualifying purchase.
/// Returns `{customer_id, first_purchase_date}` rows.
pub const FIRST_PURCHASE_SCRIPT: &str = r#"
function main() {
  function isoDate(ts) { return new Date(ts).toISOString().slice(0, 10); }

  return Events({
    from_date: "2020-01-01",
    to_date: new Date().toISOString().slice(0, 10)
  })
  .filter(function(e) {
    var phone   = e.properties["CustomerPhoneNumber"];
    var station = (e.properties["Station"] || "").toLowerCase();
    var zone    = (e.properties["Zone"] || "").toLowerCase();

    var isGuest       = e.properties["IsGuest"] === true || !phone || String(phone).toLowerCase() === "guest";
    var isTestStation = station.indexOf("test") !== -1;
    var isTestZone    = zone.indexOf("hubtel test zone – kubekrom") !== -1 || zone.indexOf("test") !== -1;

    return e.name === "Purchase" &&
           ["Food","Shop","Health"].indexOf(e.properties["AppSection"]) !== -1 &&
           e.properties["AppName"] === "Hubtel" &&
           !isGuest &&
           !isTestZone &&
           !isTestStation;
  })
  .groupBy(["properties.CustomerPhoneNumber"], mixpanel.reducer.min("time"))
  .map(function(row) {
    return {
      customer_id: row.key[0],
      first_purchase_date: isoDate(row.value)
    };
  });
}
"#;

const PURCHASE_LOGS_HEAD: &str = r#"
function main() {
  function isoDate(ts) { return new Date(ts).toISOString().slice(0, 10); }

  var targetCustomers = ["#;

const PURCHASE_LOGS_TAIL: &str = r#"];

  return Events({
    from_date: "2020-01-01",
    to_date: new Date().toISOString().slice(0, 10)
  })
  .filter(function(e) {
    var station = (e.properties["Station"] || "").toLowerCase();
    var zone    = (e.properties["Zone"] || "").toLowerCase();

    var isTestStation = station.indexOf("test") !== -1;
    var isTestZone    = zone.indexOf("hubtel test zone – kubekrom") !== -1 || zone.indexOf("test") !== -1;

    return e.name === "Purchase" &&
           ["Food","Shop","Health"].indexOf(e.properties["AppSection"]) !== -1 &&
           e.properties["AppName"] === "Hubtel" &&
           e.properties["IsGuest"] === false &&
           !isTestZone &&
           !isTestStation &&
           targetCustomers.indexOf(e.properties["CustomerPhoneNumber"]) !== -1;
  })
  .map(function(e) {
    return {
      customer_id: e.properties["CustomerPhoneNumber"],
      event_date: isoDate(e.time),
      station: e.properties["Station"] || "unknown",
      zone: e.properties["Zone"] || "unknown",
      app_version: e.properties["AppVersion"] || "unknown",
      amount: e.properties["Amount"] || 0
    };
  });
}
"#;

/// Every qualifying purchase event for exactly the given customers.
/// Returns `{customer_id, event_date, station, zone, app_version, amount}`
/// rows — one per event, unordered.
pub fn purchase_logs_script(customer_ids: &[&str]) -> String {
  let list: Vec<String> =
    customer_ids.iter().map(|id| quote_js(id)).collect();
  format!("{PURCHASE_LOGS_HEAD}{}{PURCHASE_LOGS_TAIL}", list.join(","))
}

/// Quote a customer id as a JS string literal, escaping `\` and `"`.
fn quote_js(raw: &str) -> String {
  let mut quoted = String::with_capacity(raw.len() + 2);
  quoted.push('"');
  for c in raw.chars() {
    if c == '"' || c == '\\' {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  quoted
}
