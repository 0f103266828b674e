use crate::models::DashboardResponse;

pub fn render_index(dashboard: &DashboardResponse) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &dashboard.date)
        .replace("{{FITNESS}}", &format_value(dashboard.summary.fitness))
        .replace("{{HABIT}}", &format_value(dashboard.summary.habit))
        .replace("{{TASK}}", &format_value(dashboard.summary.task))
        .replace("{{TOTAL}}", &dashboard.total_activities.to_string())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Activity Tracker</title>
  <style>
    :root {
      --bg: #f1f5f9;
      --ink: #0f172a;
      --muted: #94a3b8;
      --card: #ffffff;
      --fitness: #ea580c;
      --habit: #059669;
      --task: #2563eb;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      padding: 20px 24px;
      box-shadow: 0 1px 3px rgba(15, 23, 42, 0.08);
    }

    .total {
      font-size: 2.4rem;
      font-weight: 800;
    }

    .label {
      color: var(--muted);
      font-size: 0.75rem;
      font-weight: 700;
      letter-spacing: 0.08em;
      text-transform: uppercase;
    }

    .bar {
      height: 10px;
      background: #e2e8f0;
      border-radius: 999px;
      overflow: hidden;
      margin: 6px 0 14px;
    }

    .bar > span {
      display: block;
      height: 100%;
      background: var(--task);
    }

    .fitness { color: var(--fitness); }
    .habit { color: var(--habit); }
    .task { color: var(--task); }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #f1f5f9;
    }

    form {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    input, select, button {
      font: inherit;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid #e2e8f0;
    }

    button {
      cursor: pointer;
    }

    .filters button.active {
      background: var(--ink);
      color: #fff;
    }

    #status {
      min-height: 1.2em;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Today</h1>
      <div class="label" id="date">{{DATE}}</div>
    </header>

    <section class="cards">
      <div class="card">
        <div class="label fitness">Fitness</div>
        <div class="total" id="sum-fitness">{{FITNESS}}</div>
        <div class="label">min</div>
      </div>
      <div class="card">
        <div class="label habit">Habits</div>
        <div class="total" id="sum-habit">{{HABIT}}</div>
        <div class="label">acts</div>
      </div>
      <div class="card">
        <div class="label task">Tasks</div>
        <div class="total" id="sum-task">{{TASK}}</div>
        <div class="label">done</div>
      </div>
    </section>

    <section class="cards">
      <div class="card">
        <h2>Active Goals</h2>
        <div id="goals"></div>
      </div>
      <div class="card">
        <h2>Recent Activity</h2>
        <ul id="recent"></ul>
      </div>
    </section>

    <section class="card">
      <h2>Log Activity</h2>
      <form id="add-form">
        <select name="type">
          <option value="fitness">fitness</option>
          <option value="habit">habit</option>
          <option value="task">task</option>
        </select>
        <input name="name" placeholder="e.g. Morning Run, Drink Water..." required />
        <input name="value" type="number" step="any" min="0" placeholder="0.00" required />
        <button type="submit">Save Log</button>
      </form>
      <div id="status"></div>
    </section>

    <section class="card">
      <h2>Full History <span class="label">(<span id="total">{{TOTAL}}</span> total)</span></h2>
      <div class="filters">
        <button data-filter="all" class="active">all</button>
        <button data-filter="fitness">fitness</button>
        <button data-filter="habit">habit</button>
        <button data-filter="task">task</button>
      </div>
      <table>
        <thead>
          <tr><th>Activity</th><th>Value</th><th>Date &amp; Time</th><th></th></tr>
        </thead>
        <tbody id="history"></tbody>
      </table>
    </section>
  </main>

  <script>
    let filter = 'all';
    const statusEl = document.getElementById('status');

    const formatValue = (value) => (Number.isInteger(value) ? String(value) : value.toFixed(2));

    const setStatus = (text) => {
      statusEl.textContent = text;
    };

    const cell = (text, className) => {
      const td = document.createElement('td');
      td.textContent = text;
      if (className) {
        td.className = className;
      }
      return td;
    };

    const renderDashboard = (data) => {
      document.getElementById('date').textContent = data.date;
      document.getElementById('sum-fitness').textContent = formatValue(data.summary.fitness);
      document.getElementById('sum-habit').textContent = formatValue(data.summary.habit);
      document.getElementById('sum-task').textContent = formatValue(data.summary.task);
      document.getElementById('total').textContent = data.total_activities;

      const goals = document.getElementById('goals');
      goals.replaceChildren(...data.goals.slice(0, 3).map((goal) => {
        const row = document.createElement('div');
        const title = document.createElement('div');
        title.textContent = `${goal.name}: ${formatValue(goal.current)} / ${formatValue(goal.target)} ${goal.unit}`;
        const bar = document.createElement('div');
        bar.className = 'bar';
        const fill = document.createElement('span');
        fill.style.width = `${goal.progress}%`;
        bar.appendChild(fill);
        row.append(title, bar);
        return row;
      }));

      const recent = document.getElementById('recent');
      if (data.recent.length === 0) {
        const empty = document.createElement('li');
        empty.textContent = 'No activities logged yet today.';
        recent.replaceChildren(empty);
      } else {
        recent.replaceChildren(...data.recent.map((activity) => {
          const li = document.createElement('li');
          const time = new Date(activity.timestamp).toLocaleTimeString([], { hour: '2-digit', minute: '2-digit' });
          li.textContent = `${activity.name} ${activity.value} ${activity.unit} at ${time}`;
          li.className = activity.type;
          return li;
        }));
      }
    };

    const renderHistory = (activities) => {
      const body = document.getElementById('history');
      if (activities.length === 0) {
        const row = document.createElement('tr');
        const td = cell('No activities found matching your criteria.');
        td.colSpan = 4;
        row.appendChild(td);
        body.replaceChildren(row);
        return;
      }
      body.replaceChildren(...activities.map((activity) => {
        const row = document.createElement('tr');
        const when = new Date(activity.timestamp).toLocaleString([], { dateStyle: 'medium', timeStyle: 'short' });
        const remove = document.createElement('button');
        remove.textContent = 'Delete';
        remove.addEventListener('click', () => {
          deleteActivity(activity.id).catch((err) => setStatus(err.message));
        });
        const actions = document.createElement('td');
        actions.appendChild(remove);
        row.append(
          cell(activity.name, activity.type),
          cell(`${activity.value} ${activity.unit}`),
          cell(when),
          actions
        );
        return row;
      }));
    };

    const fetchJson = async (url, options) => {
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const refresh = async () => {
      const [dashboard, history] = await Promise.all([
        fetchJson('/api/dashboard'),
        fetchJson(`/api/activities?type=${filter}`)
      ]);
      renderDashboard(dashboard);
      renderHistory(history);
    };

    const deleteActivity = async (id) => {
      await fetchJson(`/api/activities/${encodeURIComponent(id)}`, { method: 'DELETE' });
      await refresh();
    };

    document.getElementById('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      setStatus('Saving...');
      fetchJson('/api/activities', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          type: form.get('type'),
          name: form.get('name'),
          value: form.get('value')
        })
      })
        .then(() => {
          event.target.reset();
          setStatus('Saved');
          return refresh();
        })
        .catch((err) => setStatus(err.message));
    });

    document.querySelectorAll('.filters button').forEach((button) => {
      button.addEventListener('click', () => {
        filter = button.dataset.filter;
        document.querySelectorAll('.filters button').forEach((other) => {
          other.classList.toggle('active', other === button);
        });
        refresh().catch((err) => setStatus(err.message));
      });
    });

    refresh().catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailySummary;

    #[test]
    fn index_shows_today_totals() {
        let dashboard = DashboardResponse {
            date: "2026-01-05".into(),
            summary: DailySummary {
                fitness: 35.0,
                habit: 2.5,
                task: 0.0,
            },
            goals: Vec::new(),
            recent: Vec::new(),
            total_activities: 12,
        };
        let html = render_index(&dashboard);
        assert!(html.contains(r#"<div class="label" id="date">2026-01-05</div>"#));
        assert!(html.contains(r#"id="sum-fitness">35<"#));
        assert!(html.contains(r#"id="sum-habit">2.50<"#));
        assert!(html.contains(r#"<span id="total">12</span>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn script_formats_totals_like_the_server() {
        assert_eq!(format_value(0.1 + 0.2), "0.30");
        assert_eq!(format_value(8.0), "8");
        assert!(INDEX_HTML.contains("value.toFixed(2)"));
        for id in ["sum-fitness", "sum-habit", "sum-task"] {
            let field = id.trim_start_matches("sum-");
            let line = format!(
                "document.getElementById('{id}').textContent = formatValue(data.summary.{field});"
            );
            assert!(INDEX_HTML.contains(&line), "{id} is not formatted");
        }
    }
}
