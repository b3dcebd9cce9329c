use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use mdtoc::view::DocView;
use mdtoc_core::crossterm_input::input_event_from_crossterm;
use mdtoc_core::input::InputEvent;
use mdtoc_core::input::KeyCode;
use mdtoc_core::theme::Theme;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

const DEFAULT_DOCS: &str = r#"# API 接口文档

## 概述

本文档描述了平台提供的 RESTful API 接口。所有 API 请求都应发送到服务器的基础 URL。

**Base URL**: `https://your-domain.com/v1`

## 认证

大多数 API 请求需要认证。请在请求头中包含 API Key：

```http
Authorization: Bearer YOUR_API_KEY
```

API Key 可以在控制台的令牌管理页面中创建和管理。

---

## 接口列表

### 1. 聊天完成 (Chat Completion)

发送聊天请求并获取模型回复。

**Endpoint**: `POST /chat/completions`

**请求体**:

```json
{
  "model": "gpt-4",
  "messages": [{ "role": "user", "content": "Hello" }],
  "temperature": 0.7
}
```

### 2. 文本嵌入 (Embeddings)

将文本转换为向量表示。

**Endpoint**: `POST /embeddings`

### 3. 模型列表 (Models)

获取当前可用的模型列表。

**Endpoint**: `GET /models`

## 错误处理

API 使用标准 HTTP 状态码：

- `200` 请求成功
- `401` 认证失败，检查 API Key
- `429` 请求频率超限
- `500` 服务器内部错误

## 速率限制

请求频率受令牌配置约束，超限请求返回 `429`，建议指数退避重试。

## Keybindings

- `Tab`: switch focus between the contents sidebar and the document
- `j/k` or arrows: scroll (document) / move selection (sidebar)
- `Enter`: jump to the selected section
- `q`: quit
"#;

fn main() -> io::Result<()> {
    let source = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_DOCS.to_string(),
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let mut view = DocView::new();
    view.set_markdown(&source);

    loop {
        terminal.draw(|f| {
            let area = f.area();
            view.render(area, f.buffer_mut(), &theme);
        })?;

        view.tick();

        if !crossterm::event::poll(Duration::from_millis(30))? {
            continue;
        }
        let Some(event) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        if let InputEvent::Key(key) = event
            && key.code == KeyCode::Char('q')
        {
            break;
        }
        view.handle_event(event);
    }

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    Ok(())
}
