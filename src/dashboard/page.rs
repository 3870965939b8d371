use crate::export::CONTENT_TYPE;
use actix_web::{get, HttpResponse};

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type(CONTENT_TYPE).body(INDEX)
}

// Files stay in the browser. Every change re-submits the whole form, so the
// server never has to remember an upload.
const INDEX: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>부산광역시 설계공모 당선작 지도</title>
  <style>
    body { font-family: sans-serif; margin: 0; display: flex; height: 100vh; }
    aside { width: 320px; padding: 16px; box-sizing: border-box; overflow-y: auto; background: #f6f6f6; }
    main { flex: 1; display: flex; flex-direction: column; padding: 16px; box-sizing: border-box; }
    h1 { font-size: 20px; margin: 0 0 12px 0; }
    label { display: block; margin: 16px 0 6px 0; font-weight: bold; font-size: 14px; }
    select { width: 100%; min-height: 160px; }
    iframe { flex: 1; width: 100%; border: 1px solid #ddd; }
    #status { margin: 8px 0; font-size: 14px; }
    #status.error { color: #c0392b; }
    #download[hidden] { display: none; }
  </style>
</head>
<body>
  <aside>
    <form id="dashboard">
      <label for="spreadsheet">건물 정보가 담긴 엑셀 파일을 업로드하세요.</label>
      <input id="spreadsheet" name="spreadsheet" type="file" accept=".xlsx,.xlsm,.xls,.ods,.csv" />
      <label for="photos">사진 파일을 업로드하세요.</label>
      <input id="photos" name="photos" type="file" accept=".jpg,.jpeg,.png" multiple />
      <label for="district">시군구 선택</label>
      <select id="district" name="district" multiple></select>
      <label for="usage">용도 선택</label>
      <select id="usage" name="usage" multiple></select>
    </form>
  </aside>
  <main>
    <h1>부산광역시 설계공모 당선작 지도</h1>
    <div>엑셀 파일을 업로드하여 건물 정보의 위치와 사진을 지도에 표시합니다.</div>
    <div id="status"></div>
    <a id="download" download="map.html" hidden>HTML 파일 다운로드</a>
    <iframe id="map" title="map"></iframe>
  </main>
  <script>
    (function () {
      var form = document.getElementById('dashboard');
      var spreadsheet = document.getElementById('spreadsheet');
      var districts = document.getElementById('district');
      var usages = document.getElementById('usage');
      var status = document.getElementById('status');
      var download = document.getElementById('download');
      var frame = document.getElementById('map');
      var pending = 0;

      function setStatus(text, isError) {
        status.textContent = text;
        status.className = isError ? 'error' : '';
      }

      function clearMap() {
        frame.srcdoc = '';
        if (download.href) URL.revokeObjectURL(download.href);
        download.removeAttribute('href');
        download.hidden = true;
      }

      function fillOptions(select, values) {
        var selected = Array.prototype.map.call(select.selectedOptions, function (it) { return it.value; });
        select.textContent = '';
        values.forEach(function (value) {
          var option = document.createElement('option');
          option.value = value;
          option.textContent = value;
          option.selected = selected.indexOf(value) !== -1;
          select.appendChild(option);
        });
      }

      async function refresh(resetFilters) {
        if (spreadsheet.files.length === 0) return;
        if (resetFilters) {
          districts.textContent = '';
          usages.textContent = '';
        }
        var ticket = ++pending;
        setStatus('처리 중...', false);
        var res = await fetch('/api/render', { method: 'POST', body: new FormData(form) });
        var body = await res.json();
        if (ticket !== pending) return;
        if (!res.ok) {
          clearMap();
          setStatus(body.message, true);
          return;
        }
        fillOptions(districts, body.districts);
        fillOptions(usages, body.usages);
        if (!body.html) {
          clearMap();
          setStatus(body.message, false);
          return;
        }
        setStatus('업로드된 데이터: ' + body.row_count + '건', false);
        frame.srcdoc = body.html;
        if (download.href) URL.revokeObjectURL(download.href);
        download.href = URL.createObjectURL(new Blob([body.html], { type: 'text/html' }));
        download.hidden = false;
      }

      spreadsheet.addEventListener('change', function () { refresh(true); });
      document.getElementById('photos').addEventListener('change', function () { refresh(false); });
      districts.addEventListener('change', function () { refresh(false); });
      usages.addEventListener('change', function () { refresh(false); });
    })();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod test {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;

    #[actix_web::test]
    async fn index() {
        let app = test::init_service(App::new().service(super::index)).await;
        let req = TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, res.status());
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains(r#"name="spreadsheet""#));
        assert!(body.contains("/api/render"));
    }
}
