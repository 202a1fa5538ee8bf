//! The single HTML page, rendered by plain substitution

use crate::market::MarketStats;
use crate::utils::group_thousands;
use crate::valuation::Valuation;

/// Values substituted into the page
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// `None` renders the idle page
    pub valuation: Option<&'a Valuation>,
    pub stats: &'a MarketStats,
    /// Serialized Plotly figure
    pub chart_json: &'a str,
    /// Calendar year shown in the footer
    pub year: i32,
}

/// Growth with an explicit sign and one decimal: `+5.5`, `-2.0`
pub fn format_growth(growth_pct: f64) -> String {
    format!("{:+.1}", growth_pct)
}

fn result_block(valuation: &Valuation, stats: &MarketStats) -> String {
    format!(
        r#"
            <div class="result">
                ${prediction}
                <div class="rent">Estimated Monthly Rent ≈ ${rent}/mo</div>
                <div class="range">Range: ${lower} – ${upper} (±12%)</div>
            </div>

            <div class="stats">
                <div class="stat-card">
                    <div class="stat-value">{growth}%</div>
                    <div class="stat-label">Avg Yearly Price Growth</div>
                </div>
                <div class="stat-card">
                    <div class="stat-value">${avg_rent}</div>
                    <div class="stat-label">Market Avg Monthly Rent</div>
                </div>
            </div>
"#,
        prediction = group_thousands(valuation.prediction),
        rent = group_thousands(valuation.rent),
        lower = group_thousands(valuation.lower),
        upper = group_thousands(valuation.upper),
        growth = format_growth(stats.growth_pct),
        avg_rent = group_thousands(stats.average_rent),
    )
}

/// Render the page for the idle or valued state
pub fn render(ctx: &PageContext<'_>) -> String {
    let result = ctx
        .valuation
        .map(|v| result_block(v, ctx.stats))
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{RESULT}}", &result)
        .replace("{{YEAR}}", &ctx.year.to_string())
        .replace("{{CHART_JSON}}", ctx.chart_json)
}

pub const NOT_FOUND_HTML: &str =
    "<!DOCTYPE html><html><head><title>404 Not Found</title></head><body><h1>Not Found</h1><p>Visit <a href=\"/\">/</a> for a valuation.</p></body></html>";

pub const METHOD_NOT_ALLOWED_HTML: &str =
    "<!DOCTYPE html><html><head><title>405 Method Not Allowed</title></head><body><h1>Method Not Allowed</h1><p>Use GET or POST on /.</p></body></html>";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LUXE House AI</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        :root{--gold:#fbbf24;--dark:#0f172a;--card:#1e293b;--text:#f1f5f9;--green:#10b981}
        body{margin:0;font-family:'Segoe UI',sans-serif;background:linear-gradient(135deg,#0f172a,#1e1b4b);color:var(--text);min-height:100vh;padding:20px}
        .header{text-align:center;padding:40px 20px;background:linear-gradient(to right,#1e293b,#312e81);border-bottom:4px solid var(--gold);margin-bottom:30px;border-radius:20px 20px 0 0}
        h1{font-size:3.5rem;margin:0;background:linear-gradient(to right,#fbbf24,#fcd34d);-webkit-background-clip:text;-webkit-text-fill-color:transparent}
        .container{max-width:1400px;margin:0 auto;display:grid;grid-template-columns:1fr 1fr;gap:40px}
        @media(max-width:1100px){.container{grid-template-columns:1fr}}
        .card{background:var(--card);border-radius:24px;padding:40px;box-shadow:0 30px 70px rgba(0,0,0,0.8);border:2px solid rgba(251,191,36,0.4)}
        label{display:block;font-weight:bold;color:var(--gold);margin:25px 0 10px 5px;font-size:1.2rem}
        input,select{width:100%;padding:18px;border-radius:16px;border:2px solid #334155;background:#1e293b;color:white;font-size:18px;box-sizing:border-box}
        input:focus,select:focus{outline:none;border-color:var(--gold);box-shadow:0 0 0 6px rgba(251,191,36,0.3)}
        button{width:100%;padding:22px;margin-top:40px;background:linear-gradient(to right,var(--gold),#f59e0b);border:none;border-radius:18px;color:black;font-size:1.7rem;font-weight:bold;cursor:pointer;transition:.4s}
        button:hover{transform:translateY(-8px);box-shadow:0 30px 60px rgba(251,191,36,0.7)}
        .result{margin-top:45px;padding:40px;background:linear-gradient(135deg,#166534,var(--green));border-radius:24px;text-align:center;font-size:3.3rem;color:white;border:6px solid var(--gold);font-weight:bold}
        .rent{font-size:1.8rem;margin-top:16px}
        .range{font-size:1.35rem;margin-top:18px;opacity:0.9}
        .stats{margin-top:45px;display:grid;grid-template-columns:1fr 1fr;gap:25px}
        .stat-card{background:rgba(251,191,36,0.2);padding:25px;border-radius:20px;text-align:center;border:3px solid var(--gold)}
        .stat-value{font-size:2.1rem;font-weight:bold;color:var(--gold)}
        .stat-label{font-size:1rem;color:#cbd5e1;margin-top:8px}
        #chart{border-radius:20px;overflow:hidden;box-shadow:0 20px 50px rgba(0,0,0,0.6);background:#1e293b}
        footer{text-align:center;padding:40px;color:#64748b;font-size:1rem}
    </style>
</head>
<body>
    <div class="header">
        <h1>LUXE House AI</h1>
        <p style="color:#94a3b8;font-size:1.5rem;margin-top:10px">Instant Professional Valuation &amp; Market Trends</p>
    </div>

    <div class="container">
        <div class="card">
            <form method="post">
                <label>Square Footage (sq ft)</label>
                <input type="number" name="area" value="3200" required min="500">

                <label>Bedrooms</label>
                <select name="bedrooms"><option>1</option><option>2</option><option selected>3</option><option>4</option><option>5</option><option>6+</option></select>

                <label>Bathrooms</label>
                <select name="bathrooms"><option>1</option><option selected>2</option><option>3</option><option>4</option><option>5+</option></select>

                <label>Floors</label>
                <select name="floors"><option>1</option><option selected>2</option><option>3</option><option>4</option></select>

                <label>Year Built</label>
                <input type="number" name="yearbuilt" value="2005" required min="1900" max="2025">

                <label>Location</label>
                <select name="location"><option>Downtown</option><option selected>Suburban</option><option>Urban</option><option>Rural</option></select>

                <label>Condition</label>
                <select name="condition"><option>Poor</option><option>Fair</option><option selected>Good</option><option>Excellent</option></select>

                <label>Garage</label>
                <select name="garage"><option>No</option><option selected>Yes</option></select>

                <button type="submit">Get Instant Valuation</button>
            </form>
{{RESULT}}
        </div>

        <div class="card">
            <h2 style="text-align:center;color:var(--gold);font-size:1.8rem;margin-bottom:20px">Price Trends Over Time</h2>
            <div id="chart"></div>
        </div>
    </div>

    <footer>LUXE House AI • {{YEAR}} • AI-Powered Real Estate Intelligence</footer>

    <script>
        const chartData = {{CHART_JSON}};
        Plotly.newPlot('chart', chartData.data, chartData.layout, {responsive: true});
    </script>
</body>
</html>
"#;
