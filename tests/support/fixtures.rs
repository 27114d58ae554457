//! WebBook page fixtures mirroring the live markup.

use wiremock::ResponseTemplate;

/// 200 response with an HTML body.
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/html; charset=UTF-8")
}

/// 200 response with a plain-text body.
pub fn text(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/plain")
}

/// Benzene compound page: MS and GC data, 2D and 3D structure files, no IR.
pub const BENZENE_PAGE: &str = r#"<html><head><title>Benzene</title></head><body>
<h1 id="Top">Benzene</h1>
<ul>
<li><strong>Formula:</strong> C<sub>6</sub>H<sub>6</sub></li>
<li><strong><a href="http://goldbook.iupac.org/R05271.html">Molecular weight</a>:</strong> 78.1118</li>
<li><div clss="inchi-text-holder"><strong><span>IUPAC Standard InChI:</span></strong>
<ul><li><span class="inchi-text">InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H</span></li></ul></div></li>
<li><div class="inchi-text-holder"><strong><span>IUPAC Standard InChIKey:</span></strong>
<ul><li><span class="inchi-text">UHOVQNZJYSORNB-UHFFFAOYSA-N</span></li></ul></div></li>
<li><strong>CAS Registry Number:</strong>&nbsp;71-43-2</li>
<li><strong>Chemical structure:</strong> available as a
<a href="/cgi/cbook.cgi?Str2File=C71432">2d Mol file</a> or as a
<a href="/cgi/cbook.cgi?Str3File=C71432">3d SD file</a></li>
<li><strong>Other names:</strong> Annulene;
Benzol;
Cyclohexatriene</li>
<li><strong>Other data available:</strong>
<ul>
<li><a href="/cgi/cbook.cgi?ID=C71432&amp;Units=SI&amp;Mask=1#Thermo-Gas">Gas phase thermochemistry data</a></li>
<li><a href="/cgi/cbook.cgi?ID=C71432&amp;Units=SI&amp;Mask=200#Mass-Spec">Mass spectrum (electron ionization)</a></li>
<li><a href="/cgi/cbook.cgi?ID=C71432&amp;Units=SI&amp;Mask=2000#Gas-Chrom">Gas Chromatography</a></li>
</ul></li>
<li><strong>Options:</strong>
<ul><li><a href="/cgi/cbook.cgi?ID=C71432&amp;Units=CAL">Switch to calorie-based units</a></li></ul></li>
</ul>
</body></html>"#;

/// Argon compound page: no data pages, no structure files.
pub const ARGON_PAGE: &str = r#"<html><body>
<h1 id="Top">Argon</h1>
<ul>
<li><strong>Formula:</strong> Ar</li>
<li><strong>Molecular weight:</strong> 39.948</li>
<li><strong>CAS Registry Number:</strong> 7440-37-1</li>
<li><strong>Options:</strong>
<ul><li><a href="/cgi/cbook.cgi?ID=C7440371&amp;Units=CAL">Switch to calorie-based units</a></li></ul></li>
</ul>
</body></html>"#;

/// Anthracene compound page with its InChIKey.
pub const ANTHRACENE_PAGE: &str = r#"<html><body>
<h1 id="Top">Anthracene</h1>
<ul>
<li><strong>Formula:</strong> C<sub>14</sub>H<sub>10</sub></li>
<li><strong>Molecular weight:</strong> 178.2292</li>
<li><div class="inchi-text-holder"><strong><span>IUPAC Standard InChIKey:</span></strong>
<ul><li><span class="inchi-text">MWPLVEDNUUSJAV-UHFFFAOYSA-N</span></li></ul></div></li>
<li><strong>CAS Registry Number:</strong> 120-12-7</li>
<li><strong>Options:</strong>
<ul><li><a href="/cgi/cbook.cgi?ID=C120127&amp;Units=CAL">Switch to calorie-based units</a></li></ul></li>
</ul>
</body></html>"#;

/// Mass spectrum data page linking one spectrum.
pub const BENZENE_MS_PAGE: &str = r#"<html><body>
<h1>Benzene</h1>
<h2 id="Mass-Spec">Mass spectrum (electron ionization)</h2>
<p><a href="/cgi/cbook.cgi?JCAMP=C71432&amp;Index=0&amp;Type=Mass">Download spectrum in JCAMP-DX format.</a></p>
</body></html>"#;

/// JCAMP-DX body for the benzene mass spectrum.
pub const BENZENE_MS_JDX: &str = "##TITLE=Benzene\n##JCAMP-DX=4.24\n##DATA TYPE=MASS SPECTRUM\n##NPOINTS=2\n##XYDATA=(XY..XY)\n77,190\n78,9999\n##END=\n";

/// Gas chromatography overview page linking one large-format table.
pub const BENZENE_GC_PAGE: &str = r#"<html><body>
<h1>Benzene</h1>
<h2 id="Gas-Chrom">Gas Chromatography</h2>
<p><a href="/cgi/cbook.cgi?ID=C71432&amp;Units=SI&amp;Mask=2000&amp;Type=KOVATS-RI-NON-POLAR-ISOTHERMAL">View large format table.</a></p>
</body></html>"#;

/// Large-format retention index table.
pub const BENZENE_GC_TABLE: &str = r##"<html><body>
<h1>Benzene</h1>
<h2 id="Gas-Chrom">Kovats' RI, non-polar column, isothermal</h2>
<table class="data">
<tr><th>Column type</th><td>Capillary</td><td>Packed</td></tr>
<tr><th>Active phase</th><td>SE-30</td><td>Apiezon L</td></tr>
<tr><th>Temperature (C)</th><td>100.</td><td>130.</td></tr>
<tr><th>I</th><td>653.</td><td>658.</td></tr>
<tr><th>Reference</th><td><a href="#ref-1">Smith, 1990</a></td><td><a href="#ref-1">Smith, 1990</a></td></tr>
<tr><th>Comment</th><td></td><td>MSDC-RI</td></tr>
</table>
<h2 id="Refs">References</h2>
<p><span id="ref-1">[1]</span> Smith, J., Retention of aromatics, J. Chromatogr., 1990, 500, 1-10. <a href="/x">[all data]</a></p>
</body></html>"##;

/// 2D MOL file for benzene (truncated atom block is fine for pass-through).
pub const BENZENE_MOL_2D: &str = "C71432\n  -NIST-\n\n  6  6  0  0  0  0  0  0  0  0  1 V2000\nM  END\n";

/// Valid V2000 MOL block for ethanol.
pub const ETHANOL_MOL: &str = "\
ethanol
  webbook

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.8660   -0.2500    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    0.2500    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.8660   -0.2500    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  2  3  1  0  0  0  0
M  END
";

/// Name search with no match.
pub const NAME_NOT_FOUND: &str =
    "<html><body><h1>Name Not Found</h1><p>No species matched.</p></body></html>";

/// InChI lookup with no match.
pub const INCHI_NOT_FOUND: &str =
    "<html><body><h1>Information from the InChI</h1><p>No matching species found.</p></body></html>";

/// Search listing with the given identifiers.
pub fn listing(ids: &[String], truncated: bool) -> String {
    let mut body = String::from("<html><body>\n<h1>Search Results</h1>\n");
    if truncated {
        body.push_str(
            "<p>Due to the large number of matching species, only the first 400 are shown.</p>\n",
        );
    }
    body.push_str(&format!(
        "<p>A total of {} matching species were found.</p>\n<ol>\n",
        ids.len()
    ));
    for id in ids {
        body.push_str(&format!(
            "<li><a href=\"/cgi/cbook.cgi?ID={id}&amp;Units=SI\">Species {id}</a></li>\n"
        ));
    }
    body.push_str("</ol>\n</body></html>");
    body
}

/// `count` distinct identifiers `C1000`, `C1001`, ...
pub fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("C{}", 1000 + i)).collect()
}
