// End-to-end tests for the Naija TTS Backend API
//
// Each test starts its own server on an ephemeral port, wired like `main`
// but with in-process fake engines in place of the cloud and local backends.
// Voice samples land in a per-test temp dir, so tests run in parallel.

mod test_auth;
mod test_tts;
