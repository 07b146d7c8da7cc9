use axum::{extract::State, response::Html};

use crate::AppState;

#[axum::debug_handler]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_status_page(state.connection.is_ready()))
}

pub fn render_status_page(ready: bool) -> String {
    let (emoji, text) = if ready {
        ("✅", "Conectado")
    } else {
        ("❌", "Desconectado")
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Usuarios API - Docker + MongoDB</title>
  <style>
    body {{
      font-family: Arial, sans-serif;
      max-width: 800px;
      margin: 50px auto;
      padding: 20px;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      color: white;
    }}
    .container {{
      background: rgba(255,255,255,0.1);
      padding: 30px;
      border-radius: 10px;
    }}
    h1 {{ margin-top: 0; }}
    .status {{
      padding: 15px;
      background: rgba(255,255,255,0.2);
      border-radius: 5px;
      margin: 20px 0;
    }}
    a {{
      display: inline-block;
      margin: 10px 10px 10px 0;
      padding: 10px 20px;
      background: rgba(255,255,255,0.3);
      color: white;
      text-decoration: none;
      border-radius: 5px;
    }}
    a:hover {{ background: rgba(255,255,255,0.5); }}
  </style>
</head>
<body>
  <div class="container">
    <h1>🚀 Usuarios API: Docker + MongoDB</h1>
    <div class="status">
      <strong>Estado de MongoDB:</strong> {emoji} {text}
    </div>
    <h3>📍 Rutas disponibles:</h3>
    <a href="/api/test">🧪 Probar MongoDB</a>
    <a href="/api/usuarios">👥 Ver Usuarios</a>
    <a href="/api/health">💚 Estado del Servidor</a>
  </div>
</body>
</html>
"#
    )
}
