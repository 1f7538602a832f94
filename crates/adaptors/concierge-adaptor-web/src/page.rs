//! Browser front end
//!
//! A single page that talks to the session API and uses the browser's own
//! speech recognition and synthesis.

use concierge_core::{CAPTURE_UNAVAILABLE, SAMPLE_QUESTIONS};

const TEMPLATE: &str = r#"<!doctype html><html><head><meta charset='utf-8'>
<meta name='viewport' content='width=device-width, initial-scale=1'>
<title>Hotel AI Assistant</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f4f1ec; color: #222; }
  main { max-width: 880px; margin: 0 auto; padding: 24px; display: grid; grid-template-columns: 2fr 1fr; gap: 16px; }
  h1 { grid-column: 1 / -1; margin: 0 0 8px; font-size: 22px; }
  .panel { background: #fff; border-radius: 10px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
  #log { height: 420px; overflow-y: auto; display: flex; flex-direction: column; gap: 8px; }
  .msg { padding: 8px 12px; border-radius: 8px; max-width: 85%; white-space: pre-wrap; }
  .user { align-self: flex-end; background: #2f6f5e; color: #fff; }
  .assistant { align-self: flex-start; background: #ece7df; }
  form { display: flex; gap: 8px; margin-top: 12px; }
  input[type=text] { flex: 1; padding: 8px; border: 1px solid #ccc; border-radius: 6px; }
  button { padding: 8px 12px; border: 0; border-radius: 6px; background: #2f6f5e; color: #fff; cursor: pointer; }
  button:disabled { opacity: .5; cursor: default; }
  #samples button { display: block; width: 100%; margin-bottom: 6px; background: #8a6d3b; text-align: left; }
  #status { font-size: 13px; color: #666; margin-top: 8px; }
  #callbacks li { font-size: 13px; margin-bottom: 6px; }
</style></head>
<body><main>
  <h1>Hotel AI Assistant</h1>
  <section class='panel'>
    <div id='log'></div>
    <form id='composer'>
      <input id='text' type='text' autocomplete='off' placeholder='Ask about rooms, packages, dining...'>
      <button type='submit' id='send'>Send</button>
      <button type='button' id='mic'>Speak</button>
    </form>
    <div id='status'>ready</div>
  </section>
  <aside>
    <div class='panel' id='samples'><strong>Try asking</strong><p></p></div>
    <div class='panel' style='margin-top:16px'><strong>Callback requests</strong><ul id='callbacks'></ul></div>
  </aside>
</main>
<script>
const SAMPLE_QUESTIONS = {{SAMPLES}};
const CAPTURE_UNAVAILABLE = {{CAPTURE_UNAVAILABLE}};
let sessionId = null;
let pending = 0;
let rendered = 0;

const log = document.getElementById('log');
const statusLine = document.getElementById('status');
const input = document.getElementById('text');

function setStatus(text) { statusLine.textContent = text; }

function speak(text) {
  if (!('speechSynthesis' in window)) return;
  window.speechSynthesis.cancel();
  window.speechSynthesis.speak(new SpeechSynthesisUtterance(text));
}

function render(session) {
  // Responses can arrive out of order; never go back to an older view
  if (session.messages.length < rendered) return;
  rendered = session.messages.length;
  log.innerHTML = '';
  for (const m of session.messages) {
    const div = document.createElement('div');
    div.className = 'msg ' + m.role;
    div.textContent = m.content;
    log.appendChild(div);
  }
  log.scrollTop = log.scrollHeight;
  const list = document.getElementById('callbacks');
  list.innerHTML = '';
  for (const c of session.callbacks) {
    const li = document.createElement('li');
    li.textContent = c.time + ' ' + c.phone + ': ' + c.userText;
    list.appendChild(li);
  }
}

async function createSession() {
  const res = await fetch('/api/sessions', { method: 'POST' });
  const session = await res.json();
  sessionId = session.id;
  rendered = 0;
  render(session);
}

async function post(text) {
  const res = await fetch('/api/sessions/' + sessionId + '/messages', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text })
  });
  if (res.status === 404) { await createSession(); return post(text); }
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

// Every submission is sent; the server answers them in order
async function submit(text) {
  text = (text || '').trim();
  if (!text) return;
  await ready;
  pending++;
  setStatus('Asking AI...');
  let error = null;
  try {
    const data = await post(text);
    render(data.session);
    speak(data.reply);
  } catch (e) {
    error = e;
  } finally {
    pending--;
  }
  setStatus(error ? 'Error: ' + error.message : (pending > 0 ? 'Asking AI...' : 'ready'));
}

document.getElementById('composer').addEventListener('submit', (ev) => {
  ev.preventDefault();
  const text = input.value.trim();
  if (!text) return;
  input.value = '';
  submit(text);
});

const samples = document.querySelector('#samples p');
for (const q of SAMPLE_QUESTIONS) {
  const b = document.createElement('button');
  b.type = 'button';
  b.textContent = q;
  b.onclick = () => submit(q);
  samples.appendChild(b);
}

const Recognition = window.SpeechRecognition || window.webkitSpeechRecognition;
const mic = document.getElementById('mic');
if (!Recognition) {
  mic.disabled = true;
  setStatus(CAPTURE_UNAVAILABLE);
} else {
  mic.onclick = () => {
    const rec = new Recognition();
    rec.lang = 'en-US';
    rec.interimResults = false;
    rec.maxAlternatives = 1;
    rec.onstart = () => setStatus('listening');
    rec.onresult = (ev) => { setStatus('ready'); submit(ev.results[0][0].transcript); };
    rec.onerror = (ev) => setStatus('Recognition error: ' + ev.error);
    rec.onend = () => { if (statusLine.textContent === 'listening') setStatus('ready'); };
    rec.start();
  };
}

const ready = createSession().catch((e) => setStatus('Error: ' + e.message));
</script></body></html>"#;

/// Render the page with the sample prompts and status strings inlined
pub fn render_index() -> String {
    let samples = serde_json::to_string(&SAMPLE_QUESTIONS).unwrap_or_else(|_| "[]".to_string());
    let unavailable =
        serde_json::to_string(CAPTURE_UNAVAILABLE).unwrap_or_else(|_| "\"\"".to_string());
    TEMPLATE
        .replace("{{SAMPLES}}", &samples)
        .replace("{{CAPTURE_UNAVAILABLE}}", &unavailable)
}
