use crate::models::{AppData, Counter, PeriodKind};
use crate::rollover::preview_streak;

pub fn render_index(data: &AppData) -> String {
    let mut sections = String::new();
    for kind in PeriodKind::ALL {
        sections.push_str(&render_section(data, kind));
    }
    INDEX_HTML.replace("{{SECTIONS}}", &sections)
}

fn render_section(data: &AppData, kind: PeriodKind) -> String {
    let record = data.streaks.get(kind);
    let preview = preview_streak(data, kind);
    let unit = if record.best == 1 { kind.noun() } else { kind.noun_plural() };

    let mut rows = String::new();
    for counter in data.counters.iter().filter(|counter| counter.kind == kind) {
        rows.push_str(&render_counter(counter));
    }
    if rows.is_empty() {
        rows.push_str("    <li class=\"empty\">Nothing here yet.</li>\n");
    }

    format!(
        r#"<section class="group" data-kind="{kind}">
  <header class="group-head">
    <h2>{heading}</h2>
    <p class="streak" title="Streak if this {noun} ended right now: {preview}">
      <span class="flame">&#128293;</span> {current}
      <span class="muted">(best {best} {unit}, on track for {preview})</span>
    </p>
  </header>
  <ul class="counters">
{rows}  </ul>
</section>
"#,
        kind = kind_value(kind),
        heading = kind.heading(),
        noun = kind.noun(),
        current = record.current,
        best = record.best,
    )
}

fn render_counter(counter: &Counter) -> String {
    let done = if counter.progress >= counter.target { " done" } else { "" };
    format!(
        r#"    <li class="counter{done}" data-id="{id}">
      <span class="title">{title}</span>
      <span class="progress">{progress}&thinsp;/&thinsp;{target}</span>
      <span class="controls">
        <button type="button" onclick="adjust('{id}', -1)">&minus;</button>
        <button type="button" class="plus" onclick="adjust('{id}', 1)">+</button>
        <button type="button" class="ghost" onclick="editTarget('{id}', {target})">target</button>
        <button type="button" class="ghost" onclick="rename('{id}')">rename</button>
        <button type="button" class="ghost danger" onclick="removeCounter('{id}')">&times;</button>
      </span>
    </li>
"#,
        id = counter.id,
        title = escape_html(&counter.title),
        progress = counter.progress,
        target = counter.target,
    )
}

fn kind_value(kind: PeriodKind) -> &'static str {
    match kind {
        PeriodKind::Daily => "daily",
        PeriodKind::Weekly => "weekly",
        PeriodKind::Monthly => "monthly",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --ok: #3f7d4e;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .group {
      border-top: 1px solid rgba(47, 72, 88, 0.14);
      padding-top: 18px;
    }

    .group-head {
      display: flex;
      align-items: baseline;
      justify-content: space-between;
      gap: 12px;
      flex-wrap: wrap;
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--accent-2);
    }

    .streak {
      margin: 0;
      font-size: 1.05rem;
      font-weight: 500;
    }

    .muted {
      color: #7a766f;
      font-weight: 400;
      font-size: 0.9rem;
    }

    .counters {
      list-style: none;
      margin: 14px 0 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .counter {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      background: rgba(255, 255, 255, 0.7);
      border: 1px solid rgba(47, 72, 88, 0.1);
      border-radius: 16px;
      padding: 10px 14px;
    }

    .counter.done {
      border-color: var(--ok);
      background: rgba(63, 125, 78, 0.1);
    }

    .counter.done .progress {
      color: var(--ok);
      font-weight: 600;
    }

    .title {
      flex: 1;
      min-width: 0;
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
    }

    .progress {
      font-variant-numeric: tabular-nums;
    }

    .empty {
      margin: 14px 0 0;
      color: #9a958c;
      font-style: italic;
    }

    button {
      font: inherit;
      border: none;
      border-radius: 12px;
      padding: 6px 12px;
      cursor: pointer;
      background: var(--accent-2);
      color: #fff;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button.plus {
      background: var(--accent);
    }

    button.ghost {
      background: transparent;
      color: var(--accent-2);
      padding: 6px 6px;
      font-size: 0.85rem;
    }

    button.ghost.danger {
      color: #b04a33;
    }

    form.add {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
    }

    form.add input[type="text"] {
      flex: 1;
      min-width: 180px;
      font: inherit;
      border: 1px solid rgba(47, 72, 88, 0.25);
      border-radius: 12px;
      padding: 8px 12px;
      background: rgba(255, 255, 255, 0.85);
    }

    form.add select {
      font: inherit;
      border: 1px solid rgba(47, 72, 88, 0.25);
      border-radius: 12px;
      padding: 8px 10px;
      background: rgba(255, 255, 255, 0.85);
    }

    #status {
      min-height: 1.2em;
      margin: 0;
      font-size: 0.9rem;
      color: #b04a33;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Tracker</h1>
      <p class="subtitle">Hit every target in a group to keep its streak alive.</p>
    </header>

    <form class="add" id="add-form">
      <input type="text" id="add-title" placeholder="New habit" maxlength="80" required />
      <select id="add-kind">
        <option value="daily">daily</option>
        <option value="weekly">weekly</option>
        <option value="monthly">monthly</option>
      </select>
      <button type="submit">Add</button>
    </form>
    <p id="status" role="status"></p>

{{SECTIONS}}
  </main>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message) => {
      statusEl.textContent = message || '';
    };

    const call = async (path, method, body) => {
      try {
        const res = await fetch(path, {
          method,
          headers: body === undefined ? {} : { 'Content-Type': 'application/json' },
          body: body === undefined ? undefined : JSON.stringify(body),
        });
        if (!res.ok) {
          setStatus(await res.text());
          return false;
        }
        return true;
      } catch (err) {
        setStatus('request failed');
        return false;
      }
    };

    const refresh = () => window.location.reload();

    const adjust = async (id, delta) => {
      const action = delta > 0 ? 'increment' : 'decrement';
      if (await call(`/api/counters/${id}/${action}`, 'POST')) refresh();
    };

    const editTarget = async (id, current) => {
      const raw = window.prompt('Target per period', String(current));
      if (raw === null) return;
      const value = Math.trunc(Number(raw));
      if (!Number.isFinite(value)) {
        setStatus('target must be a number');
        return;
      }
      if (await call(`/api/counters/${id}/target`, 'POST', { value })) refresh();
    };

    const rename = async (id) => {
      const value = window.prompt('New name');
      if (value === null || !value.trim()) return;
      if (await call(`/api/counters/${id}/title`, 'POST', { value })) refresh();
    };

    const removeCounter = async (id) => {
      if (!window.confirm('Delete this habit?')) return;
      if (await call(`/api/counters/${id}`, 'DELETE')) refresh();
    };

    document.getElementById('add-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const title = document.getElementById('add-title').value.trim();
      const kind = document.getElementById('add-kind').value;
      if (!title) return;
      if (await call('/api/counters', 'POST', { title, kind })) refresh();
    });

    // Period boundaries are detected whenever the widget comes back into
    // view, so a tab left open overnight catches up on its own.
    const checkRollover = async () => {
      try {
        const res = await fetch('/api/rollover', { method: 'POST' });
        if (!res.ok) return;
        const body = await res.json();
        if (body.changed) refresh();
      } catch (err) {
        // Offline or mid-restart; the hourly server check still runs.
      }
    };

    document.addEventListener('visibilitychange', () => {
      if (!document.hidden) checkRollover();
    });
  </script>
</body>
</html>
"#;
