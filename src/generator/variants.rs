/*!
 * Presentation strategies for hub artifacts.
 *
 * All three variants render the same data; each contributes its layout
 * markup, its stylesheet and the runtime function that fills the layout.
 * Containers filled at run time carry `data-rendered` so the runtime can
 * clear them before rendering and before saving.
 */

use crate::model::DesignVariant;
use super::runtime::escape_html;

/// Display strategy selected by a hub's design variant
pub trait PresentationStrategy: Send + Sync {
    /// Variant this strategy renders
    fn variant(&self) -> DesignVariant;

    /// Static layout markup; `activation` is empty or a leading-space attribute
    fn layout_markup(&self, hub_name: &str, activation: &str) -> String;

    /// Variant stylesheet
    fn stylesheet(&self) -> &'static str;

    /// Name of the runtime function that renders the layout
    fn render_function(&self) -> &'static str;

    /// Runtime script defining `render_function`
    fn script(&self) -> &'static str;
}

/// Strategy for `design`
pub fn strategy_for(design: DesignVariant) -> &'static dyn PresentationStrategy {
    match design {
        DesignVariant::Netflix => &NetflixLayout,
        DesignVariant::Youtube => &YoutubeLayout,
        DesignVariant::Custom => &CustomLayout,
    }
}

/// Hero banner plus one horizontal row per channel and playlist
pub struct NetflixLayout;

impl PresentationStrategy for NetflixLayout {
    fn variant(&self) -> DesignVariant {
        DesignVariant::Netflix
    }

    fn layout_markup(&self, hub_name: &str, activation: &str) -> String {
        format!(
            r#"<div id="layout-netflix" class="layout hidden">
<div class="nav"><h2 class="brand"{}>{}</h2></div>
<div class="hero" id="n-hero" data-rendered></div>
<div id="n-rows" data-rendered></div>
</div>"#,
            activation,
            escape_html(&hub_name.to_uppercase())
        )
    }

    fn stylesheet(&self) -> &'static str {
        r##"body.d-netflix { background: #141414; }
.nav { position: fixed; top: 0; width: 100%; padding: 20px 4%; display: flex; justify-content: space-between; align-items: center; z-index: 50; background: linear-gradient(#000, transparent); }
.nav .brand { color: #e50914; font-weight: 900; font-size: 1.8rem; cursor: pointer; }
.hero { height: 70vh; display: flex; align-items: flex-end; padding: 4%; background: #222; background-size: cover; background-position: center; }
.hero h1 { font-size: 3rem; font-weight: 900; }
.hero-play { padding: 10px 30px; font-size: 1.2rem; font-weight: bold; margin-top: 20px; }
.row { padding: 20px 4%; }
.row-title { font-size: 1.5rem; font-weight: bold; margin-bottom: 10px; }
.row-scroller { display: flex; gap: 10px; overflow-x: auto; padding-bottom: 20px; }
.card { min-width: 250px; cursor: pointer; transition: transform 0.3s; position: relative; }
.card:hover { transform: scale(1.08); z-index: 10; }
.card-thumb { aspect-ratio: 16/9; background: #333; border-radius: 4px; overflow: hidden; }
"##
    }

    fn render_function(&self) -> &'static str {
        "renderNetflix"
    }

    fn script(&self) -> &'static str {
        r##"function renderNetflix(s) {
  document.getElementById('layout-netflix').classList.remove('hidden');
  const hero = document.getElementById('n-hero');
  const rows = document.getElementById('n-rows');
  const all = [];
  s.content.forEach(function (c) { c.content.forEach(function (v) { all.push(v); }); });
  if (all.length > 0) {
    const featured = all[0];
    if (featured.thumbnail) {
      hero.style.backgroundImage = 'linear-gradient(to top, #141414, transparent), url(' + featured.thumbnail + ')';
    }
    const info = el('div', 'hero-info');
    info.appendChild(textEl('h1', featured.title));
    const watch = textEl('button', 'WATCH', 'hero-play');
    watch.onclick = function () { play(featured.id); };
    info.appendChild(watch);
    hero.appendChild(info);
  }
  s.content.forEach(function (c) {
    if (c.content.length === 0) return;
    rows.appendChild(netflixRow(c.meta.name, c.content));
    (c.playlists || []).forEach(function (p) {
      const videos = playlistVideos(c, p);
      if (videos.length > 0) rows.appendChild(netflixRow(c.meta.name + ' / ' + p.title, videos));
    });
  });
}

function netflixRow(title, videos) {
  const row = el('div', 'row');
  row.appendChild(textEl('h3', title, 'row-title'));
  const scroller = el('div', 'row-scroller');
  videos.forEach(function (v) { scroller.appendChild(card(v, 'card')); });
  row.appendChild(scroller);
  return row;
}
"##
    }
}

/// Channel sidebar plus a video grid
pub struct YoutubeLayout;

impl PresentationStrategy for YoutubeLayout {
    fn variant(&self) -> DesignVariant {
        DesignVariant::Youtube
    }

    fn layout_markup(&self, hub_name: &str, activation: &str) -> String {
        format!(
            r#"<div id="layout-youtube" class="layout hidden">
<div class="sidebar"><h2 class="brand"{}>{}</h2><div id="y-sidebar" data-rendered></div></div>
<div class="main"><div class="grid" id="y-grid" data-rendered></div></div>
</div>"#,
            activation,
            escape_html(hub_name)
        )
    }

    fn stylesheet(&self) -> &'static str {
        r##"body.d-youtube { background: #0f0f0f; }
#layout-youtube { display: flex; }
.sidebar { width: 240px; min-height: 100vh; background: #0f0f0f; padding: 20px; border-right: 1px solid #222; }
.sidebar .brand { font-weight: 900; margin-bottom: 20px; cursor: pointer; }
.side-link { padding: 10px; cursor: pointer; opacity: 0.7; }
.side-link:hover { opacity: 1; }
.main { flex: 1; padding: 20px; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 20px; }
.yt-card { cursor: pointer; }
.yt-thumb { aspect-ratio: 16/9; background: #333; border-radius: 10px; overflow: hidden; margin-bottom: 10px; }
.yt-channel { color: #aaa; font-size: 0.8rem; }
"##
    }

    fn render_function(&self) -> &'static str {
        "renderYoutube"
    }

    fn script(&self) -> &'static str {
        r##"function renderYoutube(s) {
  document.getElementById('layout-youtube').classList.remove('hidden');
  const sidebar = document.getElementById('y-sidebar');
  const grid = document.getElementById('y-grid');
  const show = function (channels) {
    grid.innerHTML = '';
    channels.forEach(function (c) {
      c.content.forEach(function (v) {
        const item = card(v, 'yt-card');
        item.appendChild(textEl('p', c.meta.name, 'yt-channel'));
        grid.appendChild(item);
      });
    });
  };
  const link = function (label, channels) {
    const node = textEl('div', label, 'side-link');
    node.onclick = function () { show(channels); };
    sidebar.appendChild(node);
  };
  link('All', s.content);
  s.content.forEach(function (c) { link(c.meta.name, [c]); });
  show(s.content);
}
"##
    }
}

/// One tile per channel, opening its first video
pub struct CustomLayout;

impl PresentationStrategy for CustomLayout {
    fn variant(&self) -> DesignVariant {
        DesignVariant::Custom
    }

    fn layout_markup(&self, hub_name: &str, activation: &str) -> String {
        format!(
            r#"<div id="layout-custom" class="layout hidden">
<div class="custom-wrap"><h1 class="brand"{}>{}</h1><div id="c-grid" class="c-grid" data-rendered></div></div>
</div>"#,
            activation,
            escape_html(hub_name)
        )
    }

    fn stylesheet(&self) -> &'static str {
        r##".custom-wrap { padding: 40px; }
.custom-wrap .brand { font-size: 3rem; font-weight: 900; margin-bottom: 40px; cursor: pointer; }
.c-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 20px; }
.c-tile { background: #111; border-radius: 20px; overflow: hidden; aspect-ratio: 1; position: relative; cursor: pointer; border: 1px solid #222; }
.c-tile img { opacity: 0.5; }
.c-tile h2 { position: absolute; bottom: 20px; left: 20px; font-weight: 900; }
"##
    }

    fn render_function(&self) -> &'static str {
        "renderCustom"
    }

    fn script(&self) -> &'static str {
        r##"function renderCustom(s) {
  document.getElementById('layout-custom').classList.remove('hidden');
  const grid = document.getElementById('c-grid');
  s.content.forEach(function (c) {
    const tile = el('div', 'c-tile');
    const first = c.content[0];
    if (first && first.thumbnail) {
      const img = el('img');
      img.src = first.thumbnail;
      tile.appendChild(img);
    }
    tile.appendChild(textEl('h2', c.meta.name));
    tile.onclick = function () { if (first) play(first.id); };
    grid.appendChild(tile);
  });
}
"##
    }
}
