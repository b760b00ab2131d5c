use crate::forms::{FormState, ParameterDraft, TankDraft, WaterChangeDraft};
use crate::models::{Parameter, WaterChange};
use crate::recent::{TankPreview, RECENT_LIMIT};
use crate::shell::{View, ViewSnapshot};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn render_index(snapshot: &ViewSnapshot) -> String {
    INDEX_HTML
        .replace("{{ACTIONS}}", &render_actions(snapshot))
        .replace("{{STATUS}}", &render_status(snapshot))
        .replace("{{CONTENT}}", &render_content(snapshot))
}

fn render_actions(snapshot: &ViewSnapshot) -> String {
    let mut html = String::new();
    if !snapshot.sign_in_required && snapshot.view == View::List {
        html.push_str(
            r#"<form method="post" action="/refresh"><button class="ghost" type="submit">Refresh</button></form>
<form method="post" action="/tanks/new"><button type="submit">&#x2795; Add Tank</button></form>"#,
        );
    }
    if let Some(identity) = &snapshot.identity {
        let _ = write!(
            html,
            r#"<form method="post" action="/auth/sign-out"><span class="who">{}</span><button class="ghost" type="submit">Sign out</button></form>"#,
            escape(&identity.display_name)
        );
    }
    html
}

fn render_status(snapshot: &ViewSnapshot) -> String {
    let mut html = String::new();
    if let Some(error) = &snapshot.error {
        let _ = write!(html, r#"<p class="status error">{}</p>"#, escape(error));
    }
    if snapshot.loading {
        html.push_str(r#"<p class="status">Loading tanks...</p>"#);
    }
    html
}

fn render_content(snapshot: &ViewSnapshot) -> String {
    if snapshot.sign_in_required {
        return SIGN_IN_HTML.to_string();
    }
    match (snapshot.view, &snapshot.tank_form) {
        (View::CreateTank, Some(form)) => render_tank_form(form),
        _ => render_tank_list(snapshot),
    }
}

fn render_tank_list(snapshot: &ViewSnapshot) -> String {
    if snapshot.tanks.is_empty() {
        if snapshot.loading {
            return String::new();
        }
        return r#"<p class="empty">No tanks yet. Add one to start tracking.</p>"#.to_string();
    }

    let mut html = String::from(r#"<section class="tanks">"#);
    for tank in &snapshot.tanks {
        render_tank_card(&mut html, tank, snapshot);
    }
    html.push_str("</section>");
    html
}

fn render_tank_card(html: &mut String, tank: &TankPreview, snapshot: &ViewSnapshot) {
    let open = snapshot.open_tank.as_deref() == Some(tank.id.as_str());
    let path = urlencoding::encode(&tank.id);
    let _ = write!(
        html,
        r#"<article class="tank{open_class}" id="tank-{path}">
<form method="post" action="/tanks/{path}/toggle"><button class="tank-header" type="submit" aria-expanded="{open}">
<span class="name">{name}</span><span class="species">{species}</span><span class="volume">{volume} gal</span>
</button></form>"#,
        open_class = if open { " open" } else { "" },
        name = escape(&tank.name),
        species = escape(&tank.species),
        volume = tank.volume_gallons,
    );

    if open {
        html.push_str(r#"<div class="details">"#);
        if !tank.notes.is_empty() {
            let _ = write!(html, r#"<p class="notes">{}</p>"#, escape(&tank.notes));
        }

        let parameter_form = snapshot
            .parameter_form
            .as_ref()
            .filter(|form| form.tank_id == tank.id)
            .map(|form| render_parameter_form(&path, &form.state));
        render_section(
            html,
            "Recent Parameters",
            &format!("/tanks/{path}/parameters/toggle"),
            parameter_form,
            tank.recent_parameters.iter().map(render_parameter).collect(),
            tank.parameter_count,
            "No parameters recorded yet.",
        );

        let water_change_form = snapshot
            .water_change_form
            .as_ref()
            .filter(|form| form.tank_id == tank.id)
            .map(|form| render_water_change_form(&path, &form.state));
        render_section(
            html,
            "Recent Water Changes",
            &format!("/tanks/{path}/water-changes/toggle"),
            water_change_form,
            tank.recent_water_changes
                .iter()
                .map(render_water_change)
                .collect(),
            tank.water_change_count,
            "No water changes logged yet.",
        );
        html.push_str("</div>");
    }
    html.push_str("</article>");
}

fn render_section(
    html: &mut String,
    title: &str,
    toggle_action: &str,
    form: Option<String>,
    items: Vec<String>,
    total: usize,
    empty: &str,
) {
    let _ = write!(
        html,
        r#"<section class="records"><div class="section-head"><h3>{title}</h3>
<form method="post" action="{toggle_action}"><button class="ghost small" type="submit">{label}</button></form></div>"#,
        label = if form.is_some() { "Close" } else { "Add" },
    );
    if let Some(form) = form {
        html.push_str(&form);
    }
    if items.is_empty() {
        let _ = write!(html, r#"<p class="empty">{empty}</p>"#);
    } else {
        html.push_str("<ul>");
        for item in items {
            html.push_str(&item);
        }
        html.push_str("</ul>");
        if total > RECENT_LIMIT {
            let _ = write!(
                html,
                r#"<p class="more">Showing latest {RECENT_LIMIT} of {total}</p>"#
            );
        }
    }
    html.push_str("</section>");
}

fn render_parameter(parameter: &Parameter) -> String {
    format!(
        r#"<li><div class="line"><span>{kind}</span><span>{value} {unit}</span></div>{notes}<time datetime="{iso}">{when}</time></li>"#,
        kind = escape(&parameter.param_type),
        value = parameter.value,
        unit = escape(&parameter.unit),
        notes = render_notes(&parameter.notes),
        iso = parameter.timestamp.to_rfc3339(),
        when = display_time(parameter.timestamp),
    )
}

fn render_water_change(change: &WaterChange) -> String {
    format!(
        r#"<li><div class="line"><span>{volume} gal</span></div>{notes}<time datetime="{iso}">{when}</time></li>"#,
        volume = change.volume_gallons,
        notes = render_notes(&change.notes),
        iso = change.date.to_rfc3339(),
        when = display_time(change.date),
    )
}

fn render_notes(notes: &str) -> String {
    if notes.is_empty() {
        String::new()
    } else {
        format!(r#"<small>{}</small>"#, escape(notes))
    }
}

fn render_parameter_form(path: &str, form: &FormState<ParameterDraft>) -> String {
    let fields = &form.fields;
    format!(
        r#"<form class="record-form" method="post" action="/tanks/{path}/parameters">{error}
<label>Parameter Type<input name="paramType" value="{param_type}" placeholder="e.g. PH" required /></label>
<label>Value<input name="value" value="{value}" inputmode="decimal" placeholder="0" required /></label>
<label>Unit<input name="unit" value="{unit}" placeholder="e.g. ppm" required /></label>
<label class="wide">Notes<textarea name="notes" placeholder="Optional notes">{notes}</textarea></label>
<div class="form-actions"><button type="submit">Save</button><button class="ghost" type="submit" formaction="/tanks/{path}/parameters/cancel" formnovalidate>Cancel</button></div>
</form>"#,
        error = render_form_error(form.error.as_deref()),
        param_type = escape(&fields.param_type),
        value = escape(&fields.value),
        unit = escape(&fields.unit),
        notes = escape(&fields.notes),
    )
}

fn render_water_change_form(path: &str, form: &FormState<WaterChangeDraft>) -> String {
    let fields = &form.fields;
    format!(
        r#"<form class="record-form" method="post" action="/tanks/{path}/water-changes">{error}
<label>Volume (gallons)<input name="volumeGallons" value="{volume}" inputmode="decimal" placeholder="0" required /></label>
<label class="wide">Notes<textarea name="notes" placeholder="Optional notes">{notes}</textarea></label>
<div class="form-actions"><button type="submit">Save</button><button class="ghost" type="submit" formaction="/tanks/{path}/water-changes/cancel" formnovalidate>Cancel</button></div>
</form>"#,
        error = render_form_error(form.error.as_deref()),
        volume = escape(&fields.volume_gallons),
        notes = escape(&fields.notes),
    )
}

fn render_tank_form(form: &FormState<TankDraft>) -> String {
    let fields = &form.fields;
    format!(
        r#"<form class="record-form tank-form" method="post" action="/tanks"><h2>Add Tank</h2>{error}
<label>Name<input name="name" value="{name}" required /></label>
<label>Species<input name="species" value="{species}" required /></label>
<label>Volume (gallons)<input name="volumeGallons" value="{volume}" inputmode="decimal" placeholder="0" required /></label>
<label class="wide">Notes<textarea name="notes">{notes}</textarea></label>
<div class="form-actions"><button type="submit">Create Tank</button><button class="ghost" type="submit" formaction="/tanks/new/cancel" formnovalidate>Cancel</button></div>
</form>"#,
        error = render_form_error(form.error.as_deref()),
        name = escape(&fields.name),
        species = escape(&fields.species),
        volume = escape(&fields.volume_gallons),
        notes = escape(&fields.notes),
    )
}

fn render_form_error(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"<p class="status error">{}</p>"#, escape(message)))
        .unwrap_or_default()
}

fn display_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const SIGN_IN_HTML: &str = r#"<section class="sign-in">
<h2>Sign in to see your tanks</h2>
<p>Tank data is private to each aquarist.</p>
<form method="post" action="/auth/sign-in"><button type="submit">Sign in</button></form>
</section>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>TankMaintainer</title>
  <style>
    :root {
      --bg-1: #e6f3f8;
      --bg-2: #a7d8f5;
      --ink: #1f2a30;
      --accent: #1d72b8;
      --accent-2: #2f4858;
      --danger: #c0392b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #d4ecff 60%, #eef7fb 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      flex-wrap: wrap;
    }

    header .actions {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    button {
      border: none;
      border-radius: 12px;
      padding: 10px 16px;
      background: var(--accent);
      color: white;
      font: inherit;
      cursor: pointer;
    }

    button.ghost {
      background: rgba(47, 72, 88, 0.1);
      color: var(--accent-2);
    }

    button.small {
      padding: 6px 12px;
      font-size: 0.9rem;
    }

    .who {
      margin-right: 8px;
      color: #5f6b73;
    }

    .status {
      margin: 0;
      color: #5f6b73;
    }

    .status.error {
      color: var(--danger);
    }

    .tanks {
      display: grid;
      gap: 16px;
    }

    .tank {
      background: white;
      border-radius: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      overflow: hidden;
    }

    .tank-header {
      width: 100%;
      display: grid;
      grid-template-columns: 1fr auto;
      text-align: left;
      background: transparent;
      color: var(--ink);
      padding: 18px;
      border-radius: 0;
    }

    .tank-header .name {
      font-size: 1.2rem;
      font-weight: 600;
    }

    .tank-header .species {
      grid-row: 2;
      color: #5f6b73;
      font-size: 0.9rem;
    }

    .tank-header .volume {
      grid-row: 1 / span 2;
      align-self: center;
    }

    .tank.open .tank-header {
      background: rgba(29, 114, 184, 0.08);
    }

    .details {
      padding: 0 18px 18px;
      display: grid;
      gap: 16px;
    }

    .notes {
      font-style: italic;
      color: #6b767d;
    }

    .section-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .records ul {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 10px;
    }

    .records li {
      border: 1px solid rgba(47, 72, 88, 0.1);
      border-radius: 12px;
      padding: 10px;
      display: grid;
      gap: 4px;
      background: #f7fafc;
    }

    .records .line {
      display: flex;
      justify-content: space-between;
      font-weight: 500;
    }

    .records small,
    .records time,
    .more,
    .empty {
      color: #8b959c;
      font-size: 0.85rem;
    }

    .record-form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 12px;
      margin: 12px 0;
    }

    .record-form label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    .record-form .wide,
    .record-form h2,
    .record-form .status,
    .form-actions {
      grid-column: 1 / -1;
    }

    .form-actions {
      display: flex;
      gap: 8px;
    }

    input,
    textarea {
      border: 1px solid #cfd8dc;
      border-radius: 8px;
      padding: 8px 10px;
      font: inherit;
    }

    .sign-in {
      text-align: center;
      display: grid;
      gap: 8px;
      justify-items: center;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>TankMaintainer</h1>
      <div class="actions">{{ACTIONS}}</div>
    </header>
    {{STATUS}}
    {{CONTENT}}
  </main>
</body>
</html>
"#;
