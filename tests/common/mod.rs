//! Test utilities and fixtures for the board export test suite

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Result;
use kodegen_tools_board_export::ExportConfig;
use mockito::{Mock, ServerGuard};

#[allow(dead_code)]
pub const BOARD_SLUG: &str = "team-alpha";
#[allow(dead_code)]
pub const BOARD_PATH: &str = "/b/x7Kq/team-alpha";
#[allow(dead_code)]
pub const DATA_PATH: &str = "/api/boards/x7Kq/export";
#[allow(dead_code)]
pub const BOARD_DATA: &str = r#"{"_id":"x7Kq","title":"Team Alpha","lists":[{"title":"Doing"}]}"#;

/// Page location of the fixture board on `server`
#[allow(dead_code)]
pub fn board_location(server: &ServerGuard) -> String {
    format!("{}{BOARD_PATH}", server.url())
}

/// A rendered board page with the structure every export relies on
///
/// `head` and `lists` are spliced into the document head and the list
/// container respectively.
#[allow(dead_code)]
pub fn board_page(head: &str, lists: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Team Alpha</title>
    <link rel="icon" href="/favicon.png">
    <link rel="preload" href="/fonts/roboto.woff2" as="font">
    {head}
    <script src="/app.js"></script>
    <script>window.__state = {{}};</script>
</head>
<body>
    <div id="header-quick-access"><a href="/">All boards</a></div>
    <div id="header-main-bar">
        <h1 class="header-board-menu is-editable">
            Team   Alpha
        </h1>
        <div class="board-header-btns"><a class="board-header-btn js-toggle-sidebar">Menu</a></div>
    </div>
    <div class="board-wrapper h-feed is-sibling-sidebar-open">
        <a class="u-url p-name" href="{BOARD_PATH}">Team Alpha</a>
        <div class="board-canvas">
            {lists}
            <div class="list-composer"><input placeholder="Add list"></div>
        </div>
    </div>
    <div class="pop-over"><a href="/settings">Settings</a></div>
    <div class="board-sidebar sidebar is-open">
        <a class="download-json-link" href="{DATA_PATH}">Export JSON</a>
    </div>
</body>
</html>"#
    )
}

/// Two stylesheets, three `src` elements and one cover reusing `cover.jpg`
#[allow(dead_code)]
pub fn asset_rich_page() -> String {
    board_page(
        r#"<link rel="stylesheet" href="/css/main.css">
    <link rel="stylesheet" href="/css/theme.css">"#,
        r#"<div class="list js-list">
                <div class="list-body js-perfect-scrollbar">
                    <div class="minicards">
                        <a class="minicard-wrapper js-minicard" href="/b/x7Kq/team-alpha/c1">
                            <div class="minicard-cover" style="background-image: url('/cdn/cover.jpg?w=240')"></div>
                            <div class="minicard-title p-name"><span class="emoji">*</span> Ship it</div>
                        </a>
                        <img src="/cdn/logo.png" alt="logo">
                        <img src="/cdn/cover.jpg" alt="cover">
                        <video src="/cdn/clip.mp4"></video>
                    </div>
                    <div class="placeholder"></div>
                    <div class="placeholder"></div>
                </div>
                <div class="js-card-composer">Add card</div>
            </div>"#,
    )
}

/// No stylesheet links and no `src` elements
#[allow(dead_code)]
pub fn bare_page() -> String {
    board_page(
        "",
        r#"<div class="list"><div class="minicard-title p-name">Only card</div></div>"#,
    )
    .replace(r#"<script src="/app.js"></script>"#, "")
}

/// Serve `body` at `path`
#[allow(dead_code)]
pub async fn mock_get(server: &mut ServerGuard, path: &str, body: impl AsRef<[u8]>) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

/// Serve [`BOARD_DATA`] at [`DATA_PATH`]
#[allow(dead_code)]
pub async fn mock_board_data(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", DATA_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BOARD_DATA)
        .create_async()
        .await
}

/// Serve every asset referenced by [`asset_rich_page`]
#[allow(dead_code)]
pub async fn mock_page_assets(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        mock_get(
            server,
            "/css/main.css",
            "body{background:url(/packages/wekan-theme/upstream/img/bg.png)}",
        )
        .await,
        mock_get(server, "/css/theme.css", ".list{color:#333}").await,
        mock_get(server, "/cdn/logo.png", [0x89, b'P', b'N', b'G', 1]).await,
        mock_get(server, "/cdn/cover.jpg", [0xff, 0xd8, 0xff, 0xe0, 2]).await,
        mock_get(server, "/cdn/clip.mp4", [0, 0, 0, 0x18, b'f', b't', b'y', b'p']).await,
    ]
}

/// Export configuration writing into `dir`
#[allow(dead_code)]
pub fn test_config(dir: &Path) -> ExportConfig {
    ExportConfig::builder()
        .output_dir(dir)
        .build()
        .expect("Failed to create test config")
}

/// Decode an archive into path -> content
#[allow(dead_code)]
pub fn read_archive(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        entries.insert(file.name().to_string(), content);
    }
    Ok(entries)
}
