/*!
 * Page templates and the JavaScript runtime embedded in every artifact.
 *
 * Templates use `{name}` placeholders filled in a single pass, so text
 * substituted into a template is never scanned for further placeholders.
 * The scripts never spell the data markers, the secret statement or the
 * activation attribute verbatim; they assemble them from fragments so each
 * occurs exactly once in a rendered artifact.
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::admin::gate::BYPASS_SECRET;
use crate::model::AgeRating;
use super::contract::{SecretKeyword, SecretLiteral};

/// Placeholder token inside a template
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-z_]+)\}").expect("Invalid placeholder regex")
});

/// Placeholder marking where the data segment goes
pub const DATA_PLACEHOLDER: &str = "{data_segment}";

/// A page or script template with `{name}` placeholders
#[derive(Debug, Clone, Copy)]
pub struct Template(&'static str);

impl Template {
    /// Substitute placeholders; unknown placeholders are left untouched
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        render_str(self.0, vars)
    }

    /// Render the text before and after the data placeholder separately
    pub fn render_around_data(&self, vars: &[(&str, &str)]) -> Option<(String, String)> {
        let (before, after) = self.0.split_once(DATA_PLACEHOLDER)?;
        Some((render_str(before, vars), render_str(after, vars)))
    }
}

fn render_str(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Escape text for HTML element content and attribute values.
///
/// `/` is written as `&#47;` so markup text can never spell a data marker.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#47;"),
            _ => out.push(c),
        }
    }
    out
}

/// Badge colors keyed by rating label, as a JSON object
pub fn rating_colors_json() -> String {
    let colors: BTreeMap<&str, &str> = AgeRating::ALL
        .iter()
        .map(|rating| (rating.as_str(), rating.badge_color()))
        .collect();
    serde_json::to_string(&colors).unwrap_or_else(|_| "{}".to_string())
}

/// Shared helpers with the rating palette filled in
pub fn shared_script() -> String {
    render_str(SHARED_SCRIPT, &[("rating_colors", &rating_colors_json())])
}

/// Admin script of a hub artifact
pub fn hub_admin_script(secret: &str) -> String {
    HUB_ADMIN_SCRIPT.render(&[
        ("secret_statement", &SecretLiteral::new(SecretKeyword::Let, secret).render()),
        ("bypass", BYPASS_SECRET),
        ("patch_script", PATCH_SCRIPT),
    ])
}

/// Admin script of a single-media artifact
pub fn single_admin_script(secret: &str) -> String {
    SINGLE_ADMIN_SCRIPT.render(&[
        ("secret_statement", &SecretLiteral::new(SecretKeyword::Const, secret).render()),
        ("bypass", BYPASS_SECRET),
        ("patch_script", PATCH_SCRIPT),
    ])
}

pub const HUB_PAGE: Template = Template(r##"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{stylesheet}
</style>
</head>
<body class="d-{design}">
<script id="hub-data">
{data_segment}
</script>
{admin_script}
{layout}
<div id="player-overlay" class="player-overlay hidden">
<button class="close-btn" onclick="closePlayer()">CLOSE</button>
<video id="main-video" controls playsinline></video>
<div id="sub-line" class="sub-line hidden" data-rendered></div>
<button id="sub-toggle" class="sub-toggle hidden">CC</button>
<div id="player-watermark" class="watermark hidden"><h2>{watermark_text}</h2></div>
</div>
<script>
{runtime}
</script>
</body>
</html>
"##);

pub const SINGLE_PAGE: Template = Template(r##"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{stylesheet}
</style>
</head>
<body>
<script id="media-data">
{data_segment}
</script>
{admin_script}
<div id="player-container">
<video id="vid" controls playsinline></video>
<div class="overlay"><div class="info"><span id="rating" class="rating" data-rendered></span><h1 id="title" data-rendered></h1><p id="desc" data-rendered></p></div></div>
<div id="sub-line" class="sub-line hidden" data-rendered></div>
<button id="sub-toggle" class="sub-toggle hidden">CC</button>
{watermark}
</div>
<script>
{runtime}
</script>
</body>
</html>
"##);

pub const BASE_STYLES: &str = r##"* { margin: 0; padding: 0; box-sizing: border-box; outline: none; -webkit-tap-highlight-color: transparent; }
body { background: #000; color: #fff; font-family: 'Inter', system-ui, sans-serif; overflow-x: hidden; }
.hidden { display: none !important; }
button { cursor: pointer; border: none; font-family: inherit; }
.player-overlay { position: fixed; inset: 0; background: #000; z-index: 9999; display: flex; flex-direction: column; }
.player-overlay video { width: 100%; height: 100%; }
.close-btn { position: absolute; top: 20px; left: 20px; padding: 10px 20px; background: rgba(0,0,0,0.5); color: #fff; border-radius: 20px; z-index: 100; font-weight: bold; }
.watermark { position: absolute; top: 30px; right: 40px; z-index: 50; opacity: 0.5; cursor: pointer; transition: opacity 0.3s; }
.watermark:hover { opacity: 1; }
.sub-line { position: absolute; left: 50%; transform: translateX(-50%); max-width: 80%; padding: 4px 12px; border-radius: 4px; text-align: center; white-space: pre-line; z-index: 60; pointer-events: none; }
.sub-toggle { position: absolute; bottom: 80px; right: 30px; padding: 6px 12px; border-radius: 4px; background: rgba(255,255,255,0.85); color: #000; font-weight: 900; z-index: 70; }
.sub-toggle.off { opacity: 0.4; }
.card-title { font-size: 0.9rem; padding: 6px 2px; color: #ddd; }
.card img, .yt-thumb img, .c-tile img { width: 100%; height: 100%; object-fit: cover; display: block; }
"##;

pub const SINGLE_STYLES: &str = r##"* { margin: 0; padding: 0; box-sizing: border-box; outline: none; user-select: none; -webkit-tap-highlight-color: transparent; }
body { background: #000; overflow: hidden; font-family: 'Inter', system-ui, sans-serif; color: #fff; height: 100vh; width: 100vw; }
.hidden { display: none !important; }
#player-container { position: relative; width: 100%; height: 100%; }
video { width: 100%; height: 100%; object-fit: contain; }
.overlay { position: absolute; inset: 0; pointer-events: none; display: flex; flex-direction: column; justify-content: flex-start; padding: 40px; background: linear-gradient(180deg, rgba(0,0,0,0.8), transparent 30%); }
.info h1 { font-size: 2.2rem; font-weight: 900; margin-top: 8px; }
.info p { color: #ccc; max-width: 50%; margin-top: 6px; }
.rating { display: inline-block; padding: 2px 8px; border-radius: 4px; font-weight: 900; }
.watermark { position: absolute; top: 30px; right: 40px; z-index: 50; cursor: pointer; opacity: 0.5; transition: opacity 0.3s; }
.watermark:hover { opacity: 1; }
.admin-hotspot { position: absolute; top: 0; right: 0; width: 50px; height: 50px; z-index: 999; }
.sub-line { position: absolute; left: 50%; transform: translateX(-50%); max-width: 80%; padding: 4px 12px; border-radius: 4px; text-align: center; white-space: pre-line; z-index: 60; pointer-events: none; }
.sub-toggle { position: absolute; bottom: 80px; right: 30px; padding: 6px 12px; border-radius: 4px; background: rgba(255,255,255,0.85); color: #000; font-weight: 900; z-index: 70; cursor: pointer; border: none; }
.sub-toggle.off { opacity: 0.4; }
"##;

pub const ADMIN_STYLES: &str = r##".admin-panel { position: fixed; inset: 0; background: rgba(0,0,0,0.95); z-index: 999999; display: flex; flex-direction: column; padding: 40px; color: #fff; overflow-y: auto; font-family: sans-serif; }
.admin-panel h1 { color: #e50914; font-weight: 900; font-size: 2rem; margin-bottom: 20px; }
.admin-actions { display: flex; gap: 10px; flex-wrap: wrap; margin-bottom: 30px; }
.admin-btn { padding: 10px 20px; border-radius: 5px; font-weight: bold; color: #fff; }
.admin-btn.save { background: #28a745; }
.admin-btn.public { background: #ffc107; color: #000; }
.admin-btn.secret { background: #17a2b8; }
.admin-btn.close { background: #444; }
.admin-btn.danger { background: #dc3545; padding: 5px 10px; margin-left: 12px; }
.admin-btn.muted { background: #555; padding: 4px 8px; font-size: 0.8rem; }
.admin-btn.add { background: #333; border: 1px dashed #666; width: 100%; padding: 15px; }
.admin-channel { border: 1px solid #333; padding: 20px; margin-bottom: 20px; border-radius: 10px; background: #111; }
.admin-row { display: flex; justify-content: space-between; align-items: center; padding: 10px; background: #000; margin: 5px 0; border-radius: 4px; color: #ccc; }
"##;

/// Helpers shared by every runtime: store, cue parsing, playback binding
pub const SHARED_SCRIPT: &str = r##"const RATING_COLORS = {rating_colors};

function createStore(content) {
  return { version: 0, content: content };
}

function commit(s, mutate) {
  mutate(s.content);
  s.version += 1;
}

function tsSeconds(ts) {
  const parts = String(ts).split(':');
  if (parts.length < 3) return NaN;
  const sec = parts[2].split('.');
  return parseInt(parts[0], 10) * 3600 + parseInt(parts[1], 10) * 60 + parseInt(sec[0], 10) + parseInt(sec[1] || '0', 10) / 1000;
}

function parseCues(text) {
  const cues = [];
  let current = null;
  String(text || '').split('\n').forEach(function (raw) {
    const line = raw.trim();
    if (line.indexOf('-->') !== -1) {
      const bounds = line.split('-->');
      current = { start: tsSeconds(bounds[0].trim()), end: tsSeconds((bounds[1] || '').trim()), text: '' };
    } else if (line && line.indexOf('WEBVTT') !== 0 && !/^\d+$/.test(line)) {
      if (current) current.text = current.text ? current.text + '\n' + line : line;
    } else if (!line) {
      if (current && current.text) cues.push(current);
      current = null;
    }
  });
  if (current && current.text) cues.push(current);
  return cues;
}

function bindPlayback(video, item, subLine, toggle) {
  const cfg = item.config || {};
  const style = cfg.subStyle || {};
  const start = Number(cfg.trimStart) || 0;
  const end = Number(cfg.trimEnd) || 0;
  const cues = parseCues(item.vtt);
  let showSubs = cues.length > 0;
  subLine.style.fontSize = (style.fontSize || 1.5) + 'rem';
  subLine.style.bottom = (style.bottomOffset === undefined ? 10 : style.bottomOffset) + '%';
  subLine.style.background = 'rgba(0,0,0,' + (style.bgOpacity === undefined ? 0.6 : style.bgOpacity) + ')';
  subLine.classList.add('hidden');
  toggle.classList.toggle('hidden', !(cues.length > 0 && cfg.allowSubtitleToggle !== false));
  toggle.classList.remove('off');
  toggle.onclick = function () {
    showSubs = !showSubs;
    toggle.classList.toggle('off', !showSubs);
    if (!showSubs) subLine.classList.add('hidden');
  };
  video.onloadedmetadata = function () {
    if (start > 0) video.currentTime = start;
  };
  video.ontimeupdate = function () {
    const t = video.currentTime;
    if (end > start && t >= end) video.pause();
    const active = showSubs ? cues.find(function (c) { return t >= c.start && t <= c.end; }) : null;
    if (active) {
      subLine.textContent = active.text;
      subLine.classList.remove('hidden');
    } else {
      subLine.classList.add('hidden');
    }
  };
  video.src = item.src;
}

function el(tag, className) {
  const node = document.createElement(tag);
  if (className) node.className = className;
  return node;
}

function textEl(tag, value, className) {
  const node = el(tag, className);
  node.textContent = value || '';
  return node;
}
"##;

/// Re-serialization of the live document, shared by both admin scripts
pub const PATCH_SCRIPT: &str = r##"const MARK_START = '/* DATA_' + 'START */';
const MARK_END = '/* DATA_' + 'END */';
const SECRET_STATEMENT = new RegExp('(let|const) saved' + 'Pass = "(?:[^"\\\\]|\\\\.)*";');
const ACTIVATION = 'ondblclick="trigger' + 'Admin()"';

function scriptSafe(json) {
  return json.split('<').join('\\u003c').split('/' + '*').join('\\/' + '*').split('*' + '/').join('*\\/');
}

function quoteSecret(value) {
  return scriptSafe(JSON.stringify(String(value)));
}

function snapshotHtml() {
  const root = document.documentElement.cloneNode(true);
  const panel = root.querySelector('#admin-panel');
  if (panel) panel.remove();
  root.querySelectorAll('[data-rendered]').forEach(function (node) {
    node.innerHTML = '';
    node.removeAttribute('style');
  });
  root.querySelectorAll('.layout, .player-overlay').forEach(function (node) { node.classList.add('hidden'); });
  root.querySelectorAll('video').forEach(function (node) { node.removeAttribute('src'); });
  const html = '<!DOCTYPE html>\n' + root.outerHTML;
  return html.replace(/(<title>)([^<]*)(<\/title>)/, function (match, open, text, close) {
    return open + text.split('/').join('&#47;') + close;
  });
}

function patchDocument(html, content, secret) {
  const parts = html.split(MARK_START);
  if (parts.length !== 2) throw new Error('data start marker found ' + (parts.length - 1) + ' time(s)');
  const rest = parts[1].split(MARK_END);
  if (rest.length !== 2) throw new Error('data end marker found ' + (rest.length - 1) + ' time(s)');
  const frame = parts[0] + rest[1];
  if (!SECRET_STATEMENT.test(frame)) throw new Error('secret statement not found');
  const patched = parts[0] + MARK_START + 'const data = ' + scriptSafe(JSON.stringify(content)) + ';' + MARK_END + rest[1];
  return patched.replace(SECRET_STATEMENT, function (statement, keyword) {
    return keyword + ' saved' + 'Pass = ' + quoteSecret(secret) + ';';
  });
}

function stripActivation(html) {
  return html.split(' ' + ACTIVATION).join('').split(ACTIVATION).join('');
}

function fileStem(name) {
  const stem = String(name).replace(/[^a-z0-9]/gi, '_');
  return stem || 'clip';
}

function download(html, filename) {
  const blob = new Blob([html], { type: 'text/html' });
  const link = document.createElement('a');
  link.href = URL.createObjectURL(blob);
  link.download = filename;
  document.body.appendChild(link);
  link.click();
  document.body.removeChild(link);
}

function newId() {
  return Math.random().toString(36).slice(2, 11);
}
"##;

pub const HUB_ADMIN_SCRIPT: Template = Template(r##"<script>
{secret_statement}
let adminOpen = false;
let adminSnapshot = null;

{patch_script}

function triggerAdmin() {
  if (!savedPass) return;
  if (adminOpen) { showAdminPanel(); return; }
  const attempt = prompt('ADMIN CONSOLE\nEnter the admin secret to manage this hub:');
  if (attempt === null) return;
  if (attempt === savedPass || attempt === '{bypass}') {
    adminOpen = true;
    adminSnapshot = JSON.stringify(store.content);
    showAdminPanel();
  } else {
    alert('Incorrect secret.');
  }
}

function adminButton(label, kind, onClick) {
  const node = el('button', 'admin-btn ' + kind);
  node.textContent = label;
  node.onclick = onClick;
  return node;
}

function showAdminPanel() {
  let panel = document.getElementById('admin-panel');
  if (!panel) {
    panel = el('div', 'admin-panel');
    panel.id = 'admin-panel';
    document.body.appendChild(panel);
  }
  panel.classList.remove('hidden');
  renderAdminPanel(panel);
}

function closeAdminPanel() {
  if (adminSnapshot !== null) {
    store.content = JSON.parse(adminSnapshot);
    store.version += 1;
  }
  adminOpen = false;
  adminSnapshot = null;
  const panel = document.getElementById('admin-panel');
  if (panel) panel.classList.add('hidden');
  refresh();
}

function mutate(panel, change) {
  commit(store, change);
  refresh();
  renderAdminPanel(panel);
}

function renderAdminPanel(panel) {
  panel.innerHTML = '';
  panel.appendChild(textEl('h1', 'ADMIN PANEL'));

  const actions = el('div', 'admin-actions');
  actions.appendChild(adminButton('SAVE CHANGES (KEEP SECRET)', 'save', function () { saveAndDownload(savedPass); }));
  actions.appendChild(adminButton('REMOVE ADMIN (PUBLIC COPY)', 'public', function () {
    if (confirm('This creates a copy with no secret and no admin console. Anyone can view it, nobody can edit it. Continue?')) saveAndDownload('');
  }));
  actions.appendChild(adminButton('CHANGE SECRET', 'secret', function () {
    const next = prompt('New admin secret:');
    if (next) saveAndDownload(next);
  }));
  actions.appendChild(adminButton('CLOSE PANEL', 'close', closeAdminPanel));
  panel.appendChild(actions);

  store.content.forEach(function (channel, channelIndex) {
    const box = el('div', 'admin-channel');
    const header = textEl('h3', channel.meta.name);
    header.appendChild(adminButton('Delete channel', 'danger', function () {
      if (confirm('Delete the whole channel ' + channel.meta.name + '?')) {
        mutate(panel, function (content) { content.splice(channelIndex, 1); });
      }
    }));
    box.appendChild(header);

    channel.content.forEach(function (video, videoIndex) {
      const row = el('div', 'admin-row');
      row.appendChild(textEl('span', video.title));
      row.appendChild(adminButton('Remove', 'muted', function () {
        if (confirm('Remove video?')) {
          mutate(panel, function (content) { content[channelIndex].content.splice(videoIndex, 1); });
        }
      }));
      box.appendChild(row);
    });

    const input = el('input');
    input.type = 'file';
    input.accept = 'video/*,audio/*';
    input.onchange = function (e) { addVideo(panel, channelIndex, e.target.files[0]); };
    box.appendChild(input);
    panel.appendChild(box);
  });

  panel.appendChild(adminButton('+ NEW CHANNEL', 'add', function () {
    const name = prompt('Channel name:');
    if (name) {
      mutate(panel, function (content) {
        content.push({ meta: { id: newId(), name: name, description: '', logoBase64: null }, content: [], playlists: [] });
      });
    }
  }));
}

function addVideo(panel, channelIndex, file) {
  if (!file) return;
  const title = prompt('Video title:', file.name.replace(/\.[^/.]+$/, ''));
  if (!title) return;
  const reader = new FileReader();
  reader.onload = function (evt) {
    mutate(panel, function (content) {
      content[channelIndex].content.push({
        id: newId(), title: title, desc: 'Added from admin console', genre: 'General', rating: 'L',
        src: evt.target.result, thumbnail: null, vtt: '', config: { showWatermark: true }
      });
    });
  };
  reader.readAsDataURL(file);
}

function saveAndDownload(secret) {
  let html;
  try {
    html = patchDocument(snapshotHtml(), store.content, secret);
  } catch (err) {
    alert('Save aborted: ' + err.message);
    return;
  }
  if (!secret) html = stripActivation(html);
  download(html, fileStem(document.title) + (secret ? '_UPDATED_ADM' : '_PUBLIC') + '.html');
  adminOpen = false;
  adminSnapshot = null;
  const panel = document.getElementById('admin-panel');
  if (panel) panel.classList.add('hidden');
}
</script>"##);

pub const SINGLE_ADMIN_SCRIPT: Template = Template(r##"<script>
{secret_statement}

{patch_script}

function triggerAdmin() {
  if (!savedPass) return;
  const attempt = prompt('ADMIN CONSOLE\nEnter the admin secret:');
  if (attempt === null) return;
  if (attempt !== savedPass && attempt !== '{bypass}') {
    alert('Incorrect secret.');
    return;
  }
  const choice = prompt('1. Rename title\n2. Download backup\n3. Download public copy (no admin)');
  if (choice === '1') {
    const next = prompt('New title:', store.content.title);
    if (next) {
      commit(store, function (item) { item.title = next; });
      document.title = next;
      document.getElementById('title').textContent = next;
    }
  } else if (choice === '2' || choice === '3') {
    const publicCopy = choice === '3';
    let html;
    try {
      html = patchDocument(snapshotHtml(), store.content, publicCopy ? '' : savedPass);
    } catch (err) {
      alert('Save aborted: ' + err.message);
      return;
    }
    if (publicCopy) html = stripActivation(html);
    download(html, fileStem(document.title) + (publicCopy ? '_PUBLIC' : '_BACKUP') + '.html');
  }
}
</script>"##);

/// Hub runtime; the presentation strategy supplies the render function
pub const HUB_SCRIPT: Template = Template(r##"{shared_script}
const store = createStore(data);

function findVideo(s, id) {
  for (const channel of s.content) {
    const found = channel.content.find(function (v) { return v.id === id; });
    if (found) return found;
  }
  return null;
}

function playlistVideos(channel, playlist) {
  return (playlist.videoIds || [])
    .map(function (id) { return channel.content.find(function (v) { return v.id === id; }); })
    .filter(function (v) { return !!v; });
}

function card(video, className) {
  const node = el('div', className);
  const thumb = el('div', className === 'yt-card' ? 'yt-thumb' : 'card-thumb');
  if (video.thumbnail) {
    const img = el('img');
    img.src = video.thumbnail;
    thumb.appendChild(img);
  }
  node.appendChild(thumb);
  node.appendChild(textEl('div', video.title, 'card-title'));
  node.onclick = function () { play(video.id); };
  return node;
}

function play(id) {
  const item = findVideo(store, id);
  if (!item) return;
  const overlay = document.getElementById('player-overlay');
  const video = document.getElementById('main-video');
  const mark = document.getElementById('player-watermark');
  mark.classList.toggle('hidden', !(item.config && item.config.showWatermark));
  bindPlayback(video, item, document.getElementById('sub-line'), document.getElementById('sub-toggle'));
  overlay.classList.remove('hidden');
  video.play();
}

function closePlayer() {
  const video = document.getElementById('main-video');
  video.pause();
  document.getElementById('player-overlay').classList.add('hidden');
}

function refresh() {
  document.querySelectorAll('[data-rendered]').forEach(function (node) {
    node.innerHTML = '';
    node.removeAttribute('style');
  });
  {render_function}(store);
}

{variant_script}

refresh();
"##);

/// Single-media runtime
pub const SINGLE_SCRIPT: Template = Template(r##"{shared_script}
const store = createStore(data);

function renderSingle(s) {
  const item = s.content;
  const badge = document.getElementById('rating');
  badge.textContent = item.rating;
  badge.style.background = RATING_COLORS[item.rating] || RATING_COLORS['L'];
  document.getElementById('title').textContent = item.title;
  document.getElementById('desc').textContent = item.desc || '';
  document.title = item.title;
  bindPlayback(document.getElementById('vid'), item, document.getElementById('sub-line'), document.getElementById('sub-toggle'));
}

renderSingle(store);
"##);
